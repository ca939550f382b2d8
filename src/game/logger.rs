//! Decision logger
//!
//! Agents report what they chose (and, at higher verbosity, why) through a
//! `DecisionLogger` reached via `GameView::logger()`. Messages can go to
//! stdout, to an in-memory buffer for tests, or both.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Log a Verbose message, formatting it only when the logger will keep it
///
/// Compiles to nothing without the `verbose-logging` feature.
macro_rules! log_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            let logger = $logger;
            if logger.accepts($crate::game::VerbosityLevel::Verbose) {
                logger.verbose(&format!($($arg)*));
            }
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

/// Log an agent decision on the `controller_choice` channel
///
/// Compiles to nothing without the `verbose-logging` feature.
macro_rules! log_choice {
    ($logger:expr, $agent:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            let logger = $logger;
            if logger.accepts($crate::game::VerbosityLevel::Normal) {
                logger.controller_choice($agent, &format!($($arg)*));
            }
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = (&$logger, &$agent);
        }
    };
}

pub(crate) use log_choice;
pub(crate) use log_verbose;

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns and chosen actions (default)
    #[default]
    Normal = 2,
    /// Verbose - planner internals (plans, rejected candidates, budgets)
    Verbose = 3,
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log entry
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "controller_choice")
    pub category: Option<String>,
}

/// Guard type that provides read-only access to log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger for agent decisions and match progress
pub struct DecisionLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl DecisionLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        DecisionLogger::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        DecisionLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// A logger that neither prints nor captures
    pub fn silent() -> Self {
        DecisionLogger::with_verbosity(VerbosityLevel::Silent)
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Whether a message at `level` would be printed or captured
    pub fn accepts(&self, level: VerbosityLevel) -> bool {
        level <= self.verbosity || self.is_capturing()
    }

    /// Access captured entries without copying
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    /// Print buffered entries allowed by the current verbosity, then clear
    pub fn flush_buffer(&mut self) {
        let buffer = self.log_buffer.borrow();
        for entry in buffer.iter() {
            if entry.level <= self.verbosity {
                self.write_stdout(entry);
            }
        }
        drop(buffer);
        self.clear_logs();
    }

    /// One output line for an entry in the current format
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.output_format {
            OutputFormat::Text if entry.level == VerbosityLevel::Minimal => entry.message.clone(),
            OutputFormat::Text => format!("  {}", entry.message),
            OutputFormat::Json => {
                serde_json::to_string(entry).unwrap_or_else(|_| format!("  {}", entry.message))
            }
        }
    }

    fn write_stdout(&self, entry: &LogEntry) {
        println!("{}", self.render(entry));
    }

    fn log(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);
        let allowed = level <= self.verbosity;

        if !self.accepts(level) {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            category: category.map(str::to_string),
        };

        if should_output && allowed {
            self.write_stdout(&entry);
        }
        if should_capture {
            self.log_buffer.borrow_mut().push(entry);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, message, None);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, message, None);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, message, None);
    }

    /// Log an agent decision at Normal level
    #[inline]
    pub fn controller_choice(&self, agent_name: &str, message: &str) {
        let formatted = format!("{}: {}", agent_name, message);
        self.log(VerbosityLevel::Normal, &formatted, Some("controller_choice"));
    }
}

impl Default for DecisionLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DecisionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for DecisionLogger {
    /// Clones the settings; the capture buffer starts empty
    fn clone(&self) -> Self {
        DecisionLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

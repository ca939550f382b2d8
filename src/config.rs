//! Planner and match configuration
//!
//! Both structs deserialize from JSON with every field optional; missing
//! fields take the defaults below. Command-line flags override loaded
//! values.

use crate::ai::SearchBudget;
use crate::game::{OutputFormat, VerbosityLevel};
use crate::{Result, TavernError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default per-turn thinking time
pub const DEFAULT_TURN_MILLIS: u64 = 70_000;

/// How the lookahead search is cut off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetConfig {
    /// Wall-clock milliseconds per turn
    WallClock { millis: u64 },
    /// Search expansions per turn
    Nodes { limit: u64 },
}

impl Default for BudgetConfig {
    fn default() -> Self {
        BudgetConfig::WallClock {
            millis: DEFAULT_TURN_MILLIS,
        }
    }
}

impl BudgetConfig {
    pub fn to_budget(self) -> SearchBudget {
        match self {
            BudgetConfig::WallClock { millis } => SearchBudget::wall_clock(Duration::from_millis(millis)),
            BudgetConfig::Nodes { limit } => SearchBudget::nodes(limit),
        }
    }
}

/// Tuning for the planner agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub budget: BudgetConfig,
    /// Hero attacks on minions only above this much health (+armor)
    pub hero_attack_health_threshold: i32,
    /// Health that must remain after a hero attack on a minion
    pub hero_attack_margin: i32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            budget: BudgetConfig::default(),
            hero_attack_health_threshold: 15,
            hero_attack_margin: 10,
        }
    }
}

impl PlannerConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Kind of agent seated at a side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Uniformly random legal actions
    Random,
    /// Planner with single-ply card selection
    Balance,
    /// Planner with budgeted lookahead card selection
    Depth,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentKind::Random => write!(f, "random"),
            AgentKind::Balance => write!(f, "balance"),
            AgentKind::Depth => write!(f, "depth"),
        }
    }
}

impl FromStr for AgentKind {
    type Err = TavernError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "balance" => Ok(AgentKind::Balance),
            "depth" => Ok(AgentKind::Depth),
            _ => Err(TavernError::UnknownAgent(s.to_string())),
        }
    }
}

/// Settings for one match between two agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub player1: AgentKind,
    pub player2: AgentKind,
    pub deck1: String,
    pub deck2: String,
    pub hero_health: i32,
    /// Games still running after this many turns are draws
    pub max_turns: u32,
    pub seed: u64,
    pub verbosity: VerbosityLevel,
    /// Text or one JSON object per log line
    pub log_format: OutputFormat,
    pub planner: PlannerConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            player1: AgentKind::Depth,
            player2: AgentKind::Balance,
            deck1: "aggro".to_string(),
            deck2: "control".to_string(),
            hero_health: 30,
            max_turns: 60,
            seed: 42,
            verbosity: VerbosityLevel::Minimal,
            log_format: OutputFormat::Text,
            planner: PlannerConfig::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: MatchConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hero_health <= 0 {
            return Err(TavernError::Config(format!(
                "hero_health must be positive, got {}",
                self.hero_health
            )));
        }
        if self.max_turns == 0 {
            return Err(TavernError::Config("max_turns must be at least 1".to_string()));
        }
        Ok(())
    }
}

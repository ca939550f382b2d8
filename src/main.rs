//! tavern - run planner agents against each other on the sandbox engine

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tavern_ai::{
    config::{AgentKind, BudgetConfig, MatchConfig, PlannerConfig},
    game::{OutputFormat, VerbosityLevel},
    sandbox::{CardPool, DeckList, BUILTIN_DECKS},
    tournament::{run_match, run_tourney, TournamentConfig},
};

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

/// Search budget flags shared by the subcommands
#[derive(clap::Args, Debug, Clone)]
struct BudgetArgs {
    /// Planner thinking time per turn in milliseconds
    #[arg(long, value_name = "MS", conflicts_with = "nodes")]
    budget_ms: Option<u64>,

    /// Planner search expansions per turn (deterministic alternative to --budget-ms)
    #[arg(long, value_name = "N")]
    nodes: Option<u64>,

    /// Planner settings as JSON (flags override the file)
    #[arg(long, value_name = "FILE")]
    planner: Option<PathBuf>,
}

impl BudgetArgs {
    fn apply(&self, mut config: PlannerConfig) -> anyhow::Result<PlannerConfig> {
        if let Some(path) = &self.planner {
            config = PlannerConfig::from_json_file(path)
                .with_context(|| format!("loading planner config {}", path.display()))?;
        }
        if let Some(millis) = self.budget_ms {
            config.budget = BudgetConfig::WallClock { millis };
        }
        if let Some(limit) = self.nodes {
            config.budget = BudgetConfig::Nodes { limit };
        }
        Ok(config)
    }
}

#[derive(Parser)]
#[command(name = "tavern")]
#[command(about = "Target validation and move planning agents for a turn-based card game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a series of games between two agents
    Match {
        /// Match settings as JSON (flags override the file)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Player 1 agent (random, balance, depth)
        #[arg(long)]
        p1: Option<AgentKind>,

        /// Player 2 agent (random, balance, depth)
        #[arg(long)]
        p2: Option<AgentKind>,

        /// Player 1 deck: built-in name or deck file
        #[arg(long)]
        deck1: Option<String>,

        /// Player 2 deck: built-in name or deck file
        #[arg(long)]
        deck2: Option<String>,

        /// Number of games
        #[arg(long, short = 'g', default_value_t = 1)]
        games: usize,

        /// Set random seed for deterministic games
        #[arg(long)]
        seed: Option<u64>,

        /// Games still running after this many turns are draws
        #[arg(long)]
        max_turns: Option<u32>,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityArg>,

        /// Log as JSON lines and print the final statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run many independent games in parallel and report win rates
    Tourney {
        /// Decks to draw from (defaults to every built-in deck)
        #[arg(value_name = "DECK")]
        decks: Vec<String>,

        /// Number of games
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        /// Stop starting new games after this many seconds
        #[arg(long)]
        seconds: Option<u64>,

        /// Player 1 agent
        #[arg(long, default_value = "depth")]
        p1: AgentKind,

        /// Player 2 agent
        #[arg(long, default_value = "balance")]
        p2: AgentKind,

        /// Tournament master seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Games still running after this many turns are draws
        #[arg(long, default_value_t = 60)]
        max_turns: u32,

        #[command(flatten)]
        budget: BudgetArgs,
    },

    /// List the built-in decks and the card pool
    Cards,

    /// Print the default match configuration as JSON
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Match {
            config,
            p1,
            p2,
            deck1,
            deck2,
            games,
            seed,
            max_turns,
            budget,
            verbosity,
            json,
        } => {
            let mut match_config = match &config {
                Some(path) => MatchConfig::from_json_file(path)
                    .with_context(|| format!("loading match config {}", path.display()))?,
                None => MatchConfig::default(),
            };
            if let Some(p1) = p1 {
                match_config.player1 = p1;
            }
            if let Some(p2) = p2 {
                match_config.player2 = p2;
            }
            if let Some(deck) = deck1 {
                match_config.deck1 = deck;
            }
            if let Some(deck) = deck2 {
                match_config.deck2 = deck;
            }
            if let Some(seed) = seed {
                match_config.seed = seed;
            }
            if let Some(max_turns) = max_turns {
                match_config.max_turns = max_turns;
            }
            if let Some(verbosity) = verbosity {
                match_config.verbosity = verbosity.into();
            }
            if json {
                match_config.log_format = OutputFormat::Json;
            }
            match_config.planner = budget.apply(match_config.planner)?;
            run_match_command(&match_config, games, json)?
        }
        Commands::Tourney {
            decks,
            games,
            seconds,
            p1,
            p2,
            seed,
            max_turns,
            budget,
        } => {
            let mut config = TournamentConfig {
                games,
                time_limit: seconds.map(Duration::from_secs),
                agents: [p1, p2],
                seed,
                max_turns,
                ..TournamentConfig::default()
            };
            if !decks.is_empty() {
                config.decks = decks;
            }
            config.planner = budget.apply(config.planner)?;
            run_tourney_command(&config)?
        }
        Commands::Cards => list_cards()?,
        Commands::DefaultConfig => println!("{}", MatchConfig::default().to_json()?),
    }

    Ok(())
}

fn run_match_command(config: &MatchConfig, games: usize, json: bool) -> anyhow::Result<()> {
    if games == 0 {
        bail!("--games must be at least 1");
    }
    if !json && config.verbosity >= VerbosityLevel::Minimal {
        println!("=== tavern - Match ===");
        println!(
            "{} ({}) vs {} ({}), {} game(s), seed {}\n",
            config.player1, config.deck1, config.player2, config.deck2, games, config.seed
        );
    }

    let stats = run_match(config, games)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("\n=== Match Complete ===");
        println!("{}", stats);
        for message in &stats.fault_messages {
            println!("  fault: {}", message);
        }
    }
    Ok(())
}

fn run_tourney_command(config: &TournamentConfig) -> anyhow::Result<()> {
    println!("=== tavern - Tournament Mode ===\n");
    println!("Decks: {}", config.decks.join(", "));
    println!("Agents: P1={}, P2={}", config.agents[0], config.agents[1]);
    println!("Using tournament seed: {}", config.seed);
    match config.time_limit {
        Some(limit) => println!("Running up to {} games for {}s\n", config.games, limit.as_secs()),
        None => println!("Running {} games\n", config.games),
    }

    let report = run_tourney(config)?;
    println!("{}", report);
    Ok(())
}

fn list_cards() -> anyhow::Result<()> {
    let pool = CardPool::standard();
    println!("=== Built-in decks ===");
    for name in BUILTIN_DECKS {
        let deck = DeckList::resolve(name)?;
        println!("  {} ({} cards, hero power {})", name, deck.total_cards(), deck.hero_power);
    }
    println!("\n=== Card pool ({} cards) ===", pool.len());
    for name in pool.names() {
        let card = pool.get(name)?;
        println!("  {:>2}  {}", card.cost, name);
    }
    Ok(())
}

//! Matches and tournaments on the sandbox engine
//!
//! A match seats two agents for a series of games that share agent
//! instances, so agent lifecycle hooks see the whole series. A tournament
//! plays independent single games in parallel with rayon, drawing a deck
//! pair for each game, and aggregates win rates.
//!
//! Every game seed is derived from one master seed and the game index, so
//! a run with the same seed replays the same games regardless of thread
//! scheduling.

use crate::ai::build_agent;
use crate::config::{AgentKind, MatchConfig, PlannerConfig};
use crate::core::PlayerId;
use crate::game::{DecisionLogger, GameState, VerbosityLevel};
use crate::harness::{GameRecord, MatchRunner, MatchStats, Outcome};
use crate::sandbox::{BuiltDeck, CardPool, DeckList, SandboxEngine};
use crate::{Result, TavernError};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Seed for game `game_idx` of a run seeded with `master`
pub fn game_seed(master: u64, game_idx: u64) -> u64 {
    master.wrapping_add(game_idx.wrapping_mul(0x9E3779B97F4A7C15))
}

/// Agent seeds for both sides of a game
pub fn agent_seeds(game_seed: u64) -> [u64; 2] {
    [
        game_seed.wrapping_add(0x1234_5678_9ABC_DEF0),
        game_seed.wrapping_add(0xFEDC_BA98_7654_3210),
    ]
}

/// Two decks resolved against the card pool, ready to deal games
#[derive(Debug, Clone)]
pub struct MatchSetup {
    pub deck_names: [String; 2],
    decks: [BuiltDeck; 2],
    hero_health: i32,
}

impl MatchSetup {
    pub fn new(pool: &CardPool, deck1: &str, deck2: &str, hero_health: i32) -> Result<Self> {
        let first = DeckList::resolve(deck1)?;
        let second = DeckList::resolve(deck2)?;
        Ok(MatchSetup {
            deck_names: [first.name.clone(), second.name.clone()],
            decks: [first.build(pool)?, second.build(pool)?],
            hero_health,
        })
    }

    pub fn from_config(pool: &CardPool, config: &MatchConfig) -> Result<Self> {
        MatchSetup::new(pool, &config.deck1, &config.deck2, config.hero_health)
    }

    /// Shuffled, dealt and ready for player one's first move
    pub fn new_game(&self, seed: u64) -> GameState {
        SandboxEngine.new_game(
            ["Player 1", "Player 2"],
            [&self.decks[0], &self.decks[1]],
            self.hero_health,
            seed,
        )
    }
}

/// Play `games` games between the two agents named in `config`
///
/// The same two agent instances play every game.
pub fn run_match(config: &MatchConfig, games: usize) -> Result<MatchStats> {
    config.validate()?;
    let pool = CardPool::standard();
    let setup = MatchSetup::from_config(&pool, config)?;
    let seeds = agent_seeds(config.seed);
    let agents = [
        build_agent(config.player1, seeds[0], &config.planner),
        build_agent(config.player2, seeds[1], &config.planner),
    ];
    let mut logger = DecisionLogger::with_verbosity(config.verbosity);
    logger.set_output_format(config.log_format);
    let mut runner = MatchRunner::new(SandboxEngine, agents, logger).with_max_turns(config.max_turns);

    for game_idx in 0..games {
        let seed = game_seed(config.seed, game_idx as u64);
        runner.logger().minimal(&format!(
            "=== Game {} ({} vs {}, seed {}) ===",
            game_idx + 1,
            setup.deck_names[0],
            setup.deck_names[1],
            seed
        ));
        runner.play_game(setup.new_game(seed));
    }

    Ok(runner.finish())
}

/// Settings for a tournament run
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    /// Deck pool; each game draws both decks from it
    pub decks: Vec<String>,
    pub games: usize,
    /// Stop starting new games after this long
    pub time_limit: Option<Duration>,
    pub agents: [AgentKind; 2],
    pub seed: u64,
    pub hero_health: i32,
    pub max_turns: u32,
    pub planner: PlannerConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        let base = MatchConfig::default();
        TournamentConfig {
            decks: crate::sandbox::BUILTIN_DECKS.iter().map(|d| d.to_string()).collect(),
            games: 100,
            time_limit: None,
            agents: [base.player1, base.player2],
            seed: base.seed,
            hero_health: base.hero_health,
            max_turns: base.max_turns,
            planner: base.planner,
        }
    }
}

/// Result of one tournament game
#[derive(Debug, Clone)]
struct TourneyGame {
    decks: [usize; 2],
    outcome: Outcome,
    turns: u32,
}

/// Win/loss/draw tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.first_wins + self.second_wins + self.draws
    }
}

/// Aggregated tournament statistics
#[derive(Debug, Clone, Default)]
pub struct TournamentReport {
    pub agents: [String; 2],
    pub games: usize,
    /// Wins by seat: player one, player two, draws
    pub seats: Tally,
    /// Forfeits caused by each seat
    pub forfeits: [usize; 2],
    /// Deck name to (wins, games)
    pub deck_results: HashMap<String, (usize, usize)>,
    /// Sorted deck pair to tally; `first_wins` counts the first name
    pub matchups: HashMap<(String, String), Tally>,
    pub turns: u64,
    pub elapsed: Duration,
}

impl TournamentReport {
    fn record(&mut self, deck_names: &[String], game: &TourneyGame) {
        let names = [&deck_names[game.decks[0]], &deck_names[game.decks[1]]];
        self.games += 1;
        self.turns += u64::from(game.turns);
        for name in names {
            self.deck_results.entry(name.clone()).or_default().1 += 1;
        }

        if let Outcome::Forfeit { loser, .. } = &game.outcome {
            self.forfeits[loser.index()] += 1;
        }

        let swapped = names[0] > names[1];
        let key = if swapped {
            (names[1].clone(), names[0].clone())
        } else {
            (names[0].clone(), names[1].clone())
        };
        let matchup = self.matchups.entry(key).or_default();

        match game.outcome.winner() {
            Some(winner) => {
                let seat = winner.index();
                if winner == PlayerId::One {
                    self.seats.first_wins += 1;
                } else {
                    self.seats.second_wins += 1;
                }
                self.deck_results.entry(names[seat].clone()).or_default().0 += 1;
                if (seat == 0) != swapped {
                    matchup.first_wins += 1;
                } else {
                    matchup.second_wins += 1;
                }
            }
            None => {
                self.seats.draws += 1;
                matchup.draws += 1;
            }
        }
    }

    pub fn games_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.games as f64 / secs
        } else {
            0.0
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

impl fmt::Display for TournamentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Tournament Complete ===")?;
        writeln!(f, "Total games played: {}", self.games)?;
        writeln!(f, "Elapsed time: {:.2}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "Games per second: {:.2}", self.games_per_second())?;
        if self.games > 0 {
            writeln!(f, "Turns per game: {:.1}", self.turns as f64 / self.games as f64)?;
        }

        writeln!(f, "\n=== Player Position Statistics ===")?;
        let total = self.seats.total();
        writeln!(
            f,
            "P1 ({}) wins: {} ({:.1}%)",
            self.agents[0],
            self.seats.first_wins,
            percent(self.seats.first_wins, total)
        )?;
        writeln!(
            f,
            "P2 ({}) wins: {} ({:.1}%)",
            self.agents[1],
            self.seats.second_wins,
            percent(self.seats.second_wins, total)
        )?;
        writeln!(f, "Draws: {} ({:.1}%)", self.seats.draws, percent(self.seats.draws, total))?;
        if self.forfeits.iter().any(|&n| n > 0) {
            writeln!(f, "Forfeits: P1 {}, P2 {}", self.forfeits[0], self.forfeits[1])?;
        }

        writeln!(f, "\n=== Deck Win Rates ===")?;
        let mut decks: Vec<_> = self.deck_results.iter().collect();
        decks.sort_by_key(|(name, _)| *name);
        for (name, (wins, games)) in decks {
            writeln!(f, "  {}: {}/{} ({:.1}%)", name, wins, games, percent(*wins, *games))?;
        }

        writeln!(f, "\n=== Matchup Results ===")?;
        let mut matchups: Vec<_> = self.matchups.iter().collect();
        matchups.sort_by_key(|&(key, _)| key);
        for ((first, second), tally) in matchups {
            let games = tally.total();
            if first == second {
                writeln!(f, "  {} (mirror): {} games", first, games)?;
                writeln!(
                    f,
                    "    Player 1: {} ({:.1}%), Player 2: {} ({:.1}%), Draws: {}",
                    tally.first_wins,
                    percent(tally.first_wins, games),
                    tally.second_wins,
                    percent(tally.second_wins, games),
                    tally.draws
                )?;
            } else {
                writeln!(f, "  {} vs {}: {} games", first, second, games)?;
                writeln!(
                    f,
                    "    {} wins: {} ({:.1}%)",
                    first,
                    tally.first_wins,
                    percent(tally.first_wins, games)
                )?;
                writeln!(
                    f,
                    "    {} wins: {} ({:.1}%)",
                    second,
                    tally.second_wins,
                    percent(tally.second_wins, games)
                )?;
                if tally.draws > 0 {
                    writeln!(f, "    Draws: {} ({:.1}%)", tally.draws, percent(tally.draws, games))?;
                }
            }
        }
        Ok(())
    }
}

/// Play every game of a tournament in parallel
pub fn run_tourney(config: &TournamentConfig) -> Result<TournamentReport> {
    if config.decks.is_empty() {
        return Err(TavernError::Config("tournament needs at least one deck".to_string()));
    }
    if config.games == 0 {
        return Err(TavernError::Config("tournament needs at least one game".to_string()));
    }

    let pool = CardPool::standard();
    let mut deck_names = Vec::with_capacity(config.decks.len());
    let mut decks = Vec::with_capacity(config.decks.len());
    for name in &config.decks {
        let list = DeckList::resolve(name)?;
        deck_names.push(list.name.clone());
        decks.push(list.build(&pool)?);
    }

    let start = Instant::now();
    let deadline = config.time_limit.map(|limit| start + limit);

    let results: Vec<TourneyGame> = (0..config.games)
        .into_par_iter()
        .filter_map(|game_idx| {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return None;
            }
            let seed = game_seed(config.seed, game_idx as u64);
            let mut deck_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let pair = [deck_rng.gen_range(0..decks.len()), deck_rng.gen_range(0..decks.len())];
            let record = play_single(config, [&decks[pair[0]], &decks[pair[1]]], seed);
            Some(TourneyGame {
                decks: pair,
                outcome: record.outcome,
                turns: record.turns,
            })
        })
        .collect();

    let mut report = TournamentReport {
        agents: [config.agents[0].to_string(), config.agents[1].to_string()],
        ..TournamentReport::default()
    };
    for game in &results {
        report.record(&deck_names, game);
    }
    report.elapsed = start.elapsed();
    Ok(report)
}

fn play_single(config: &TournamentConfig, decks: [&BuiltDeck; 2], seed: u64) -> GameRecord {
    let seeds = agent_seeds(seed);
    let agents = [
        build_agent(config.agents[0], seeds[0], &config.planner),
        build_agent(config.agents[1], seeds[1], &config.planner),
    ];
    let mut runner = MatchRunner::new(SandboxEngine, agents, DecisionLogger::with_verbosity(VerbosityLevel::Silent))
        .with_max_turns(config.max_turns);
    let state = SandboxEngine.new_game(["Player 1", "Player 2"], decks, config.hero_health, seed);
    runner.play_game(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_seeds_are_distinct() {
        let seeds: Vec<u64> = (0..100).map(|i| game_seed(42, i)).collect();
        let mut sorted = seeds.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), seeds.len());
        assert_eq!(game_seed(42, 0), 42);
        let [a, b] = agent_seeds(7);
        assert_ne!(a, b);
    }

    #[test]
    fn test_setup_deals_opening_hands() {
        let pool = CardPool::standard();
        let setup = MatchSetup::new(&pool, "aggro", "control", 30).unwrap();
        let state = setup.new_game(1);
        assert_eq!(state.player(PlayerId::One).hand.len(), 4);
        assert_eq!(state.player(PlayerId::Two).hand.len(), 4);
        assert_eq!(setup.deck_names, ["aggro".to_string(), "control".to_string()]);
        assert!(MatchSetup::new(&pool, "aggro", "nonsense", 30).is_err());
    }

    #[test]
    fn test_report_matchups_follow_sorted_names() {
        let names = vec!["zoo".to_string(), "aggro".to_string()];
        let mut report = TournamentReport::default();
        report.record(
            &names,
            &TourneyGame {
                decks: [0, 1],
                outcome: Outcome::Win { winner: PlayerId::One },
                turns: 10,
            },
        );
        report.record(
            &names,
            &TourneyGame {
                decks: [1, 1],
                outcome: Outcome::Draw,
                turns: 20,
            },
        );

        assert_eq!(report.games, 2);
        assert_eq!(report.seats, Tally { first_wins: 1, second_wins: 0, draws: 1 });
        // "zoo" sat first and won, and sorts second in the matchup key
        let key = ("aggro".to_string(), "zoo".to_string());
        assert_eq!(report.matchups[&key], Tally { first_wins: 0, second_wins: 1, draws: 0 });
        assert_eq!(report.deck_results["zoo"], (1, 1));
        assert_eq!(report.deck_results["aggro"], (0, 3));
        assert_eq!(report.turns, 30);
    }

    #[test]
    fn test_random_tourney_is_reproducible() {
        let config = TournamentConfig {
            games: 6,
            agents: [AgentKind::Random, AgentKind::Random],
            ..TournamentConfig::default()
        };
        let first = run_tourney(&config).unwrap();
        let second = run_tourney(&config).unwrap();
        assert_eq!(first.games, 6);
        assert_eq!(first.seats, second.seats);
        assert_eq!(first.turns, second.turns);
        assert_eq!(first.forfeits, [0, 0]);
    }

    #[test]
    fn test_run_match_keeps_agents_across_games() {
        let config = MatchConfig {
            player1: AgentKind::Random,
            player2: AgentKind::Random,
            verbosity: VerbosityLevel::Silent,
            ..MatchConfig::default()
        };
        let stats = run_match(&config, 3).unwrap();
        assert_eq!(stats.games, 3);
        assert_eq!(stats.wins[0] + stats.wins[1] + stats.draws, 3);
        assert_eq!(stats.faults, [0, 0]);
        assert_eq!(stats.agent_names, ["random".to_string(), "random".to_string()]);
    }
}

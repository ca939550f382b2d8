//! Match harness
//!
//! Drives two agents through games against a `GameEngine`, timing each
//! side. The acting side forfeits when its decision panics or the engine
//! rejects the action it chose; the fault is recorded in the statistics.

use crate::core::PlayerId;
use crate::game::{Action, Agent, DecisionLogger, GameEngine, GameState, GameView, VerbosityLevel};
use serde::Serialize;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// How a game ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Win { winner: PlayerId },
    /// Both heroes died, or the turn limit was reached
    Draw,
    Forfeit { loser: PlayerId, reason: String },
}

impl Outcome {
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Win { winner } => Some(*winner),
            Outcome::Forfeit { loser, .. } => Some(loser.opponent()),
            Outcome::Draw => None,
        }
    }
}

/// Result of one game
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub outcome: Outcome,
    pub turns: u32,
    pub actions: usize,
    /// Decision time per side
    pub time: [Duration; 2],
    pub final_state: GameState,
}

/// Totals over all games played by a runner
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchStats {
    pub agent_names: [String; 2],
    pub games: usize,
    pub wins: [usize; 2],
    pub draws: usize,
    /// Forfeits caused by each side
    pub faults: [usize; 2],
    pub fault_messages: Vec<String>,
    pub time: [Duration; 2],
    pub turns: u64,
}

impl MatchStats {
    pub fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        self.turns += u64::from(record.turns);
        for side in 0..2 {
            self.time[side] += record.time[side];
        }
        match &record.outcome {
            Outcome::Win { winner } => self.wins[winner.index()] += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Forfeit { loser, reason } => {
                self.faults[loser.index()] += 1;
                self.wins[loser.opponent().index()] += 1;
                self.fault_messages.push(format!("{}: {}", loser, reason));
            }
        }
    }

    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins[player.index()] as f64 / self.games as f64
        }
    }

}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} games, {} draws", self.games, self.draws)?;
        for (side, player) in [PlayerId::One, PlayerId::Two].into_iter().enumerate() {
            let games = self.games.max(1) as f64;
            writeln!(
                f,
                "  {} ({}): {} wins ({:.1}%), {} faults, {:.3}s per game",
                player,
                self.agent_names[side],
                self.wins[side],
                100.0 * self.win_rate(player),
                self.faults[side],
                self.time[side].as_secs_f64() / games,
            )?;
        }
        if self.games > 0 {
            write!(f, "  {:.1} turns per game", self.turns as f64 / self.games as f64)?;
        }
        Ok(())
    }
}

/// Plays games between two agents
pub struct MatchRunner<E> {
    engine: E,
    agents: [Box<dyn Agent>; 2],
    logger: DecisionLogger,
    max_turns: u32,
    stats: MatchStats,
}

impl<E: GameEngine> MatchRunner<E> {
    /// Takes ownership of the agents and initializes them
    pub fn new(engine: E, mut agents: [Box<dyn Agent>; 2], logger: DecisionLogger) -> Self {
        for agent in agents.iter_mut() {
            agent.initialize_agent();
        }
        let stats = MatchStats {
            agent_names: [agents[0].name().to_string(), agents[1].name().to_string()],
            ..MatchStats::default()
        };
        MatchRunner {
            engine,
            agents,
            logger,
            max_turns: 90,
            stats,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn logger(&self) -> &DecisionLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut DecisionLogger {
        &mut self.logger
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Play one game from `state` to completion and record it
    pub fn play_game(&mut self, mut state: GameState) -> GameRecord {
        for agent in self.agents.iter_mut() {
            agent.initialize_game();
        }

        let mut time = [Duration::ZERO; 2];
        let mut actions = 0;
        let mut announced_turn = 0;
        let mut forfeit = None;

        while !state.is_over() && state.turn <= self.max_turns {
            let side = state.current;
            if announced_turn != state.turn {
                announced_turn = state.turn;
                if self.logger.accepts(VerbosityLevel::Normal) {
                    let player = state.player(side);
                    self.logger.normal(&format!(
                        "Turn {}. {}: [{}/{}]",
                        state.turn, side, player.mana, player.max_mana
                    ));
                }
            }

            let agent = &mut self.agents[side.index()];
            let view = GameView::new(&state, &self.engine, &self.logger);
            let started = Instant::now();
            let decision = catch_unwind(AssertUnwindSafe(|| agent.get_move(&view)));
            time[side.index()] += started.elapsed();

            let action: Action = match decision {
                Ok(action) => action,
                Err(panic) => {
                    forfeit = Some((side, panic_message(panic.as_ref())));
                    break;
                }
            };

            match self.engine.apply(&state, &action) {
                Ok(next) => {
                    state = next;
                    actions += 1;
                }
                Err(e) => {
                    forfeit = Some((side, format!("{} rejected: {}", action, e)));
                    break;
                }
            }
        }

        let outcome = match forfeit {
            Some((loser, reason)) => {
                self.logger.minimal(&format!("{} forfeits: {}", loser, reason));
                Outcome::Forfeit { loser, reason }
            }
            None => match state.winner() {
                Some(winner) => Outcome::Win { winner },
                None => Outcome::Draw,
            },
        };
        match outcome.winner() {
            Some(winner) => self.logger.minimal(&format!(
                "Game over after {} turns: {} ({}) wins",
                state.turn,
                winner,
                self.agents[winner.index()].name()
            )),
            None => self.logger.minimal(&format!("Game over after {} turns: draw", state.turn)),
        }

        for agent in self.agents.iter_mut() {
            agent.finalize_game();
        }

        let record = GameRecord {
            outcome,
            turns: state.turn,
            actions,
            time,
            final_state: state,
        };
        self.stats.record(&record);
        record
    }

    /// Finalize the agents and hand back the totals
    pub fn finish(mut self) -> MatchStats {
        for agent in self.agents.iter_mut() {
            agent.finalize_agent();
        }
        self.stats
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("agent panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("agent panicked: {}", s)
    } else {
        "agent panicked".to_string()
    }
}

//! Move planning
//!
//! The position comparator, the attack assignment solver, the card-play
//! selectors (single-ply and lookahead) and the planner that ties them
//! together, plus the agents built on them.

pub mod attack_solver;
pub mod comparator;
pub mod lookahead;
pub mod planner;
pub mod planner_agent;
pub mod random_agent;

pub use attack_solver::{group_by_attacker, Assignment, AttackAssignmentSolver, AttackerOptions};
pub use comparator::{best_of, estimated_attack, PositionComparator, SideMetrics, OFFENSE_WEIGHT};
pub use lookahead::{search, CardSelector, LookaheadScheduler, SearchBudget, SearchOutcome, SinglePlySelector};
pub use planner::{ClassifiedActions, MovePlanner};
pub use planner_agent::{BalanceAgent, DepthAgent, PlannerAgent};
pub use random_agent::RandomAgent;

use crate::config::{AgentKind, PlannerConfig};
use crate::game::Agent;

/// Build an agent of the given kind
///
/// `seed` only matters for agents that draw random numbers.
pub fn build_agent(kind: AgentKind, seed: u64, config: &PlannerConfig) -> Box<dyn Agent> {
    match kind {
        AgentKind::Random => Box::new(RandomAgent::new(seed)),
        AgentKind::Balance => Box::new(BalanceAgent::balance(config.clone())),
        AgentKind::Depth => Box::new(DepthAgent::depth(config.clone())),
    }
}

//! Target validation
//!
//! A data-driven predicate table (`predicates`) and the validator that
//! combines it with the structural targeting rules (`validator`).

pub mod predicates;
pub mod validator;

pub use predicates::{Disposition, PredicateContext, PredicateEntry, PredicateFn, PredicateTable, STANDARD_ENTRIES};
pub use validator::{needs_target_list, Rejection, TargetValidator};

//! Reference game engine
//!
//! A small rules engine, card pool and deck lists that implement the
//! `GameEngine` boundary so agents can play complete matches. It is not a
//! rules-complete game.

pub mod cards;
pub mod deck;
pub mod rules;

pub use cards::CardPool;
pub use deck::{BuiltDeck, DeckEntry, DeckList, BUILTIN_DECKS};
pub use rules::{attack_targets, SandboxEngine, OPENING_HAND};

//! Core game types and entities

pub mod card;
pub mod character;
pub mod entity;
pub mod requirement;
pub mod types;

pub use card::{CardDescriptor, CardEffect, CardKind, MinionTemplate, Playable};
pub use character::{Character, CharacterStats, Hero, Minion};
pub use entity::{EntityId, GameEntity, PlayerId};
pub use requirement::{PlayRequirement, RequirementTag};
pub use types::{CardName, Race, Rarity};

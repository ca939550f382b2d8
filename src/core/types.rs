//! Strongly-typed wrappers for game concepts
//!
//! Newtypes and small enums shared by characters, cards and requirements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}

/// Minion race
///
/// The numeric ids are the ones card data uses for the race-equals
/// requirement parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Race {
    #[default]
    None,
    Murloc,
    Demon,
    Mechanical,
    Elemental,
    Beast,
    Totem,
    Pirate,
    Dragon,
    All,
}

impl Race {
    /// Numeric id used as a requirement parameter
    pub fn id(self) -> i32 {
        match self {
            Race::None => 0,
            Race::Murloc => 14,
            Race::Demon => 15,
            Race::Mechanical => 17,
            Race::Elemental => 18,
            Race::Beast => 20,
            Race::Totem => 21,
            Race::Pirate => 23,
            Race::Dragon => 24,
            Race::All => 26,
        }
    }

    pub fn from_id(id: i32) -> Option<Race> {
        let race = match id {
            0 => Race::None,
            14 => Race::Murloc,
            15 => Race::Demon,
            17 => Race::Mechanical,
            18 => Race::Elemental,
            20 => Race::Beast,
            21 => Race::Totem,
            23 => Race::Pirate,
            24 => Race::Dragon,
            26 => Race::All,
            _ => return None,
        };
        Some(race)
    }
}

/// Card rarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Free,
    Common,
    Rare,
    Epic,
    Legendary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_race_ids_roundtrip() {
        for race in [Race::Murloc, Race::Beast, Race::Dragon, Race::Elemental] {
            assert_eq!(Race::from_id(race.id()), Some(race));
        }
        assert_eq!(Race::from_id(999), None);
    }

    #[test]
    fn test_card_name() {
        let name = CardName::from("Fireball");
        assert_eq!(name.as_str(), "Fireball");
        assert_eq!(format!("{}", name), "Fireball");
    }
}

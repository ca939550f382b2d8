//! Deck lists
//!
//! Decks use a small text format: `[HeroPower]` and `[Main]` sections with
//! one `count Card Name` entry per line. Blank lines and `#` comments are
//! skipped.

use crate::core::CardDescriptor;
use crate::sandbox::cards::CardPool;
use crate::{Result, TavernError};
use std::path::Path;
use std::sync::Arc;

/// A deck entry (card name and count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
}

/// A parsed deck list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckList {
    pub name: String,
    pub hero_power: String,
    pub main_deck: Vec<DeckEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Main,
    HeroPower,
    Other,
}

impl DeckList {
    pub fn parse(name: &str, content: &str) -> Result<DeckList> {
        let mut main_deck = Vec::new();
        let mut hero_power = None;
        let mut section = Section::Main;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                section = match line {
                    "[Main]" => Section::Main,
                    "[HeroPower]" => Section::HeroPower,
                    _ => Section::Other,
                };
                continue;
            }

            // Format: "2 Card Name"
            let Some((count, card_name)) = line.split_once(' ') else {
                return Err(TavernError::UnknownDeck(format!("{}: malformed line '{}'", name, line)));
            };
            let count: u8 = count
                .parse()
                .map_err(|_| TavernError::UnknownDeck(format!("{}: bad count in '{}'", name, line)))?;
            let card_name = card_name.trim().to_string();

            match section {
                Section::Main => main_deck.push(DeckEntry { card_name, count }),
                Section::HeroPower => hero_power = Some(card_name),
                Section::Other => {}
            }
        }

        if main_deck.is_empty() {
            return Err(TavernError::UnknownDeck(format!("{}: empty deck", name)));
        }
        let hero_power = hero_power.ok_or_else(|| TavernError::UnknownDeck(format!("{}: no hero power", name)))?;

        Ok(DeckList {
            name: name.to_string(),
            hero_power,
            main_deck,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string());
        DeckList::parse(&name, &content)
    }

    /// One of the built-in decks, or a deck file if `name` is a path
    pub fn resolve(name: &str) -> Result<DeckList> {
        match builtin_text(name) {
            Some(text) => DeckList::parse(name, text),
            None if Path::new(name).is_file() => DeckList::load_from_file(Path::new(name)),
            None => Err(TavernError::UnknownDeck(name.to_string())),
        }
    }

    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    /// Look every card up in `pool`, expanding counts
    pub fn build(&self, pool: &CardPool) -> Result<BuiltDeck> {
        let hero_power = pool.get(&self.hero_power)?;
        let mut cards = Vec::with_capacity(self.total_cards());
        for entry in &self.main_deck {
            let card = pool.get(&entry.card_name)?;
            for _ in 0..entry.count {
                cards.push(Arc::clone(&card));
            }
        }
        Ok(BuiltDeck { hero_power, cards })
    }
}

/// A deck with its cards resolved
#[derive(Debug, Clone)]
pub struct BuiltDeck {
    pub hero_power: Arc<CardDescriptor>,
    pub cards: Vec<Arc<CardDescriptor>>,
}

/// Names of the built-in decks
pub const BUILTIN_DECKS: &[&str] = &["aggro", "control", "dragons"];

const AGGRO: &str = r#"
[HeroPower]
1 Dagger Mastery

[Main]
2 Murloc Raider
2 Argent Squire
2 Worgen Infiltrator
2 Abusive Sergeant
2 Elven Archer
2 Bloodfen Raptor
2 Loot Hoarder
2 Wolfrider
2 Young Dragonhawk
2 SI:7 Agent
2 Hungry Crab
2 Chillwind Yeti
2 Eviscerate
2 Moonfire
2 Fireball
"#;

const CONTROL: &str = r#"
[HeroPower]
1 Armor Up!

[Main]
2 River Crocolisk
2 Sen'jin Shieldmasta
2 Chillwind Yeti
2 Defender of Argus
2 Kabal Songstealer
2 Big Game Hunter
2 Boulderfist Ogre
1 Cairne Bloodhoof
2 Execute
2 Shadow Word: Pain
1 Shadow Word: Death
2 Frostbolt
2 Ice Lance
2 Shield Block
2 Holy Light
2 Ice Barrier
"#;

const DRAGONS: &str = r#"
[HeroPower]
1 Fireblast

[Main]
2 Wisp
2 Fire Fly
2 Faerie Dragon
2 Netherspite Historian
2 Bloodfen Raptor
2 River Crocolisk
2 Shattered Sun Cleric
2 Azure Drake
2 Blackwing Corruptor
2 Blazecaller
2 Chillwind Yeti
2 Frostbolt
2 Mark of Nature
2 Arcane Intellect
2 Fireball
"#;

fn builtin_text(name: &str) -> Option<&'static str> {
    match name {
        "aggro" => Some(AGGRO),
        "control" => Some(CONTROL),
        "dragons" => Some(DRAGONS),
        _ => None,
    }
}

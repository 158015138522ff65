//! Card registry (C2): the injective mapping between plaintext residues and
//! face-value records.

use std::collections::HashMap;

use super::Mapping;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

/// An immutable face-value record. `value`/`highvalue` are the two numeric
/// weights used by the scorer: ace is low (1) or high (14) depending on
/// whether a straight resolves low-ace.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Card {
    pub mapping: Mapping,
    pub suit: Suit,
    pub rank: u8,
    pub value: u8,
    pub highvalue: u8,
}

impl Card {
    pub fn new(mapping: Mapping, suit: Suit, rank: u8) -> Self {
        assert!((1..=13).contains(&rank), "rank out of range: {rank}");
        let value = rank;
        let highvalue = if rank == 1 { 14 } else { rank };
        Card {
            mapping,
            suit,
            rank,
            value,
            highvalue,
        }
    }
}

/// Bijective plaintext-mapping <-> Card registry. Built once at deck
/// generation and immutable afterwards (§5, "Card registry is immutable
/// after deck generation").
#[derive(Debug, Default, Clone)]
pub struct CardRegistry {
    by_mapping: HashMap<Mapping, Card>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard 52-card registry from an ordered list of plaintext
    /// mappings (dealer's snapshot-0 order: clubs A..K, diamonds A..K, ...).
    pub fn from_plaintext_deck(mappings: &[Mapping]) -> Self {
        let mut reg = Self::new();
        for (i, m) in mappings.iter().enumerate() {
            let suit = match i / 13 {
                0 => Suit::Clubs,
                1 => Suit::Diamonds,
                2 => Suit::Hearts,
                _ => Suit::Spades,
            };
            let rank = (i % 13) as u8 + 1;
            reg.insert(Card::new(m.clone(), suit, rank));
        }
        reg
    }

    pub fn insert(&mut self, card: Card) {
        self.by_mapping.insert(card.mapping.clone(), card);
    }

    pub fn resolve(&self, mapping: &Mapping) -> Option<&Card> {
        self.by_mapping.get(mapping)
    }

    pub fn len(&self) -> usize {
        self.by_mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_mapping.is_empty()
    }
}

//! Player roster.

use std::collections::HashMap;

use super::{Keychain, PlayerId};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Player {
    pub private_id: PlayerId,
    pub is_dealer: bool,
    pub has_folded: bool,
    pub keychain: Option<Keychain>,
}

impl Player {
    pub fn new(private_id: impl Into<PlayerId>, is_dealer: bool) -> Self {
        Player {
            private_id: private_id.into(),
            is_dealer,
            has_folded: false,
            keychain: None,
        }
    }
}

/// The set of players in a hand, captured once at construction (§9,
/// transcript aliasing: the auditor copies player state rather than holding
/// a reference to the game layer's live objects).
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Roster(pub HashMap<PlayerId, Player>);

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    pub fn insert(&mut self, player: Player) {
        self.0.insert(player.private_id.clone(), player);
    }

    pub fn get(&self, pid: &str) -> Option<&Player> {
        self.0.get(pid)
    }

    pub fn dealer(&self) -> Option<&Player> {
        self.0.values().find(|p| p.is_dealer)
    }

    pub fn non_folded(&self) -> impl Iterator<Item = &Player> {
        self.0.values().filter(|p| !p.has_folded)
    }
}

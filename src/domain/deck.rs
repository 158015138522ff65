//! Deck snapshots (§3, §4.3): the ordered chain of re-encryptions between
//! the dealer's plaintext deck and the final committed encrypted deck.

use super::{Mapping, PlayerId};

/// One stage of the re-encryption chain. The zeroth snapshot is the dealer's
/// plaintext deck (`from_pid == dealer`, `cards` are plaintext mappings);
/// every later snapshot is the prior deck re-encrypted under `from_pid`'s
/// final keypair, then shuffled.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DeckSnapshot {
    pub from_pid: PlayerId,
    pub cards: Vec<Mapping>,
}

impl DeckSnapshot {
    pub fn new(from_pid: impl Into<PlayerId>, cards: Vec<Mapping>) -> Self {
        DeckSnapshot {
            from_pid: from_pid.into(),
            cards,
        }
    }
}

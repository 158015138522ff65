//! Deal entries (§3, §4.4): the per-selecting-player sequence of select and
//! decrypt rows that resolve one or more ciphertexts to plaintext cards.

use super::{Mapping, PlayerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DealKind {
    Select,
    Decrypt,
}

/// One row of a deal. `from_pid` is whoever sent this particular message
/// (the sender, not necessarily the player the deal is grouped under — see
/// `Transcript::deals`, keyed by the selecting player).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DealEntry {
    pub from_pid: PlayerId,
    pub kind: DealKind,
    pub private: bool,
    pub cards: Vec<Mapping>,
}

impl DealEntry {
    pub fn select(from_pid: impl Into<PlayerId>, cards: Vec<Mapping>, private: bool) -> Self {
        DealEntry {
            from_pid: from_pid.into(),
            kind: DealKind::Select,
            private,
            cards,
        }
    }

    pub fn decrypt(from_pid: impl Into<PlayerId>, cards: Vec<Mapping>, private: bool) -> Self {
        DealEntry {
            from_pid: from_pid.into(),
            kind: DealKind::Decrypt,
            private,
            cards,
        }
    }
}

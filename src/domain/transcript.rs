//! The transcript itself (§3): the union of deck snapshots, per-dealer deal
//! lists, keychains, roster, and `ownPID` that the verification pipeline
//! consumes. Pure data; `crate::store::TranscriptStore` is the stateful,
//! invariant-enforcing writer that builds one of these incrementally.

use std::collections::HashMap;

use super::{CardRegistry, DealEntry, DeckSnapshot, Keychain, PlayerId, Roster};
use crate::error::AnalyzerError;
use crate::showdown::ScoredHand;

#[derive(Clone, Debug, Default)]
pub struct Transcript {
    pub own_pid: PlayerId,
    pub roster: Roster,
    /// Index 0 is the dealer's plaintext deck; later entries are successive
    /// re-encryption stages, in insertion order.
    pub snapshots: Vec<DeckSnapshot>,
    /// Deal entries grouped by the selecting player, in insertion order.
    pub deals: HashMap<PlayerId, Vec<DealEntry>>,
    pub keychains: HashMap<PlayerId, Keychain>,
    pub registry: CardRegistry,
}

impl Transcript {
    pub fn new(own_pid: impl Into<PlayerId>) -> Self {
        Transcript {
            own_pid: own_pid.into(),
            ..Default::default()
        }
    }

    pub fn all_keychains_committed(&self) -> bool {
        !self.roster.0.is_empty()
            && self
                .roster
                .0
                .keys()
                .all(|pid| self.keychains.contains_key(pid))
    }
}

/// A winner: one player's identity paired with the scored permutation that
/// won (or split) the pot.
#[derive(Clone, Debug, serde::Serialize)]
pub struct WinnerEntry {
    pub player_id: PlayerId,
    pub hand: ScoredHand,
}

/// The frozen verdict (§3). Once `complete` is true the result never
/// changes; a `Some(error)` short-circuits before scoring runs.
#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct AnalysisResult {
    pub private_by_pid: HashMap<PlayerId, Vec<super::Card>>,
    pub public: Vec<super::Card>,
    pub hands: HashMap<PlayerId, Vec<ScoredHand>>,
    pub winners: Vec<WinnerEntry>,
    pub complete: bool,
    pub error: Option<AnalyzerError>,
}

impl AnalysisResult {
    pub fn failed(error: AnalyzerError) -> Self {
        AnalysisResult {
            complete: true,
            error: Some(error),
            ..Default::default()
        }
    }
}

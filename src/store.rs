//! C3: the append-only transcript store. Event callbacks from the game
//! layer funnel through the five `record_*` operations in §4.1; everything
//! else in the pipeline reads the `Transcript` this builds without ever
//! mutating it further.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::domain::{Card, CardRegistry, DealEntry, DeckSnapshot, Keychain, Mapping, PlayerId, Roster, Transcript};
use crate::error::AnalyzerError;

#[derive(Debug, Default)]
pub struct TranscriptStore {
    transcript: Transcript,
    snapshot_contributors: HashSet<PlayerId>,
    /// Set once the façade enters `Analyzing`: per-move transcript rows
    /// (deck/deal) are no longer accepted (§4.1 invariant c).
    per_move_closed: bool,
    /// Set once the keychain-commit gate resolves: keychain submissions are
    /// no longer accepted either.
    gate_closed: bool,
}

impl TranscriptStore {
    pub fn new(own_pid: impl Into<PlayerId>, roster: Roster) -> Self {
        let mut transcript = Transcript::new(own_pid);
        transcript.roster = roster;
        TranscriptStore {
            transcript,
            snapshot_contributors: HashSet::new(),
            per_move_closed: false,
            gate_closed: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    fn require_per_move_open(&self) -> Result<(), AnalyzerError> {
        if self.per_move_closed {
            return Err(AnalyzerError::Internal(
                "transcript row submitted after per-move events were unsubscribed".into(),
            ));
        }
        Ok(())
    }

    /// Called once, when the dealer first publishes face-up mappings.
    /// Populates snapshot 0 and the Card registry's active-game subset.
    pub fn record_deck_generation(
        &mut self,
        dealer_pid: impl Into<PlayerId>,
        plaintext_mappings: Vec<Mapping>,
    ) -> Result<(), AnalyzerError> {
        self.require_per_move_open()?;
        if !self.transcript.snapshots.is_empty() {
            return Err(AnalyzerError::Internal(
                "deck generation recorded more than once".into(),
            ));
        }
        let dealer_pid = dealer_pid.into();
        self.transcript.registry = CardRegistry::from_plaintext_deck(&plaintext_mappings);
        self.transcript
            .snapshots
            .push(DeckSnapshot::new(dealer_pid.clone(), plaintext_mappings));
        self.snapshot_contributors.insert(dealer_pid.clone());
        debug!(target: "poker_auditor::store", dealer = %dealer_pid, "deck generation recorded");
        Ok(())
    }

    /// Appends one deck re-encryption stage. §4.1(a): each player contributes
    /// exactly one snapshot.
    pub fn record_encryption(
        &mut self,
        player_pid: impl Into<PlayerId>,
        encrypted_deck: Vec<Mapping>,
    ) -> Result<(), AnalyzerError> {
        self.require_per_move_open()?;
        let player_pid = player_pid.into();
        if !self.snapshot_contributors.insert(player_pid.clone()) {
            return Err(AnalyzerError::Internal(format!(
                "{player_pid} contributed a deck snapshot twice"
            )));
        }
        self.transcript
            .snapshots
            .push(DeckSnapshot::new(player_pid.clone(), encrypted_deck));
        trace!(target: "poker_auditor::store", from = %player_pid, stage = self.transcript.snapshots.len() - 1, "encryption snapshot recorded");
        Ok(())
    }

    /// Appends a `{type=select}` row, beginning (or continuing) `dealer_pid`'s
    /// deal list.
    pub fn record_selection(
        &mut self,
        dealer_pid: impl Into<PlayerId>,
        from_pid: impl Into<PlayerId>,
        cards: Vec<Mapping>,
        is_private: bool,
    ) -> Result<(), AnalyzerError> {
        self.require_per_move_open()?;
        let dealer_pid = dealer_pid.into();
        self.transcript
            .deals
            .entry(dealer_pid)
            .or_default()
            .push(DealEntry::select(from_pid, cards, is_private));
        Ok(())
    }

    /// Appends a `{type=decrypt}` row. §4.1(b): a dealer's first row must be
    /// a select, so this rejects decrypts into an empty deal list.
    pub fn record_decryption(
        &mut self,
        dealer_pid: impl Into<PlayerId>,
        from_pid: impl Into<PlayerId>,
        cards: Vec<Mapping>,
        is_private: bool,
    ) -> Result<(), AnalyzerError> {
        self.require_per_move_open()?;
        let dealer_pid = dealer_pid.into();
        let has_select_already = self
            .transcript
            .deals
            .get(&dealer_pid)
            .map(|l| !l.is_empty())
            .unwrap_or(false);
        if !has_select_already {
            return Err(AnalyzerError::Internal(format!(
                "decrypt recorded for {dealer_pid} before any select"
            )));
        }
        self.transcript
            .deals
            .get_mut(&dealer_pid)
            .unwrap()
            .push(DealEntry::decrypt(from_pid, cards, is_private));
        Ok(())
    }

    /// Idempotent upsert; a second submission by the same player is ignored.
    pub fn record_keychain(&mut self, player_pid: impl Into<PlayerId>, keychain: Keychain) {
        if self.gate_closed {
            return;
        }
        let player_pid = player_pid.into();
        self.transcript
            .keychains
            .entry(player_pid)
            .or_insert(keychain);
    }

    pub fn all_keychains_committed(&self) -> bool {
        self.transcript.all_keychains_committed()
    }

    /// Called when the façade enters `Analyzing` (`gameanalyze`): per-move
    /// rows are no longer accepted.
    pub fn close_per_move(&mut self) {
        self.per_move_closed = true;
    }

    /// Called when the keychain-commit gate resolves (all committed or
    /// timeout): keychain submissions are no longer accepted either.
    pub fn close_gate(&mut self) {
        self.gate_closed = true;
    }

    /// Resolve a mapping to its registered Card, if any set set of cards a
    /// player holds privately can be drawn from the registry directly.
    pub fn resolve(&self, mapping: &Mapping) -> Option<&Card> {
        self.transcript.registry.resolve(mapping)
    }
}

//! C8: the Analyzer façade (§4.6, §6). Owns the transcript store and
//! keychain gate, drives the state machine `Active -> Analyzing -> Analyzed
//! -> Scored | Failed`, and emits a snapshot of the analysis result on every
//! transition.
//!
//! The spec frames C8 as subscribing to and unsubscribing from the game
//! layer's event surface. This crate has no concrete transport (§1
//! Non-goals), so "subscribed" per-move/keychain events are the
//! `record_*` methods below, and "unsubscribe" is the store's
//! `close_per_move`/`close_gate` guards rather than a literal channel
//! detach — calls after the corresponding close are accepted but ignored or
//! rejected exactly as an unsubscribed event would be dropped.

use std::sync::{Arc, Mutex};

use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Notify};
use tokio_stream::wrappers::WatchStream;
use tracing::{info, instrument, warn};

use crate::config::AnalyzerConfig;
use crate::crypto::CryptoPrimitive;
use crate::domain::{AnalysisResult, Keychain, Mapping, PlayerId, Roster, Transcript};
use crate::error::AnalyzerError;
use crate::gate::KeychainGate;
use crate::showdown::resolve_winners;
use crate::store::TranscriptStore;
use crate::verify::{verify_deals, verify_deck};

const LOG_TARGET: &str = "poker_auditor::analyzer";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalyzerState {
    Active,
    Analyzing,
    Analyzed,
    Scored,
    Failed,
}

/// Payload carried by every lifecycle signal: the state just entered, plus
/// the analysis result as it stands at that instant (§6, "each carrying a
/// snapshot of the analysis result").
#[derive(Clone, Debug)]
pub struct AnalyzerSnapshot {
    pub state: AnalyzerState,
    pub result: AnalysisResult,
    pub emitted_at: DateTime<Utc>,
}

impl Default for AnalyzerSnapshot {
    fn default() -> Self {
        AnalyzerSnapshot {
            state: AnalyzerState::Active,
            result: AnalysisResult::default(),
            emitted_at: Utc::now(),
        }
    }
}

pub struct Analyzer {
    store: Mutex<TranscriptStore>,
    notify: Notify,
    gate: KeychainGate,
    crypto: Arc<dyn CryptoPrimitive>,
    state_tx: watch::Sender<AnalyzerSnapshot>,
}

impl Analyzer {
    pub fn new(
        own_pid: impl Into<PlayerId>,
        roster: Roster,
        config: AnalyzerConfig,
        crypto: Arc<dyn CryptoPrimitive>,
    ) -> Self {
        let (state_tx, _) = watch::channel(AnalyzerSnapshot::default());
        Analyzer {
            store: Mutex::new(TranscriptStore::new(own_pid, roster)),
            notify: Notify::new(),
            gate: KeychainGate::new(config.keychain_commit_timeout),
            crypto,
            state_tx,
        }
    }

    /// Subscribe to lifecycle signals (`analyzing`, `analyzed`, `scored`,
    /// and this crate's addition `failed`, all represented as
    /// `AnalyzerState` transitions on one channel).
    pub fn subscribe(&self) -> watch::Receiver<AnalyzerSnapshot> {
        self.state_tx.subscribe()
    }

    /// Same lifecycle signals as [`Analyzer::subscribe`], wrapped as a
    /// `Stream` for callers that want `.next().await` instead of polling
    /// `changed()` by hand, the same ergonomic wrapping the teacher applies
    /// to its own broadcast channels in `server/demo/stream.rs`.
    pub fn subscribe_stream(&self) -> WatchStream<AnalyzerSnapshot> {
        WatchStream::new(self.state_tx.subscribe())
    }

    pub fn current(&self) -> AnalyzerSnapshot {
        self.state_tx.borrow().clone()
    }

    fn emit(&self, state: AnalyzerState, result: AnalysisResult) {
        if let Ok(dump) = serde_json::to_string(&result) {
            tracing::trace!(target: LOG_TARGET, ?state, result = %dump, "lifecycle signal");
        }
        let _ = self.state_tx.send(AnalyzerSnapshot {
            state,
            result,
            emitted_at: Utc::now(),
        });
    }

    fn lock_store(&self) -> std::sync::MutexGuard<'_, TranscriptStore> {
        self.store.lock().expect("transcript store mutex poisoned")
    }

    pub async fn record_deck_generation(
        &self,
        dealer_pid: impl Into<PlayerId>,
        plaintext_mappings: Vec<Mapping>,
    ) -> Result<(), AnalyzerError> {
        self.lock_store()
            .record_deck_generation(dealer_pid, plaintext_mappings)
    }

    pub async fn record_encryption(
        &self,
        player_pid: impl Into<PlayerId>,
        encrypted_deck: Vec<Mapping>,
    ) -> Result<(), AnalyzerError> {
        self.lock_store().record_encryption(player_pid, encrypted_deck)
    }

    pub async fn record_selection(
        &self,
        dealer_pid: impl Into<PlayerId>,
        from_pid: impl Into<PlayerId>,
        cards: Vec<Mapping>,
        is_private: bool,
    ) -> Result<(), AnalyzerError> {
        self.lock_store()
            .record_selection(dealer_pid, from_pid, cards, is_private)
    }

    pub async fn record_decryption(
        &self,
        dealer_pid: impl Into<PlayerId>,
        from_pid: impl Into<PlayerId>,
        cards: Vec<Mapping>,
        is_private: bool,
    ) -> Result<(), AnalyzerError> {
        self.lock_store()
            .record_decryption(dealer_pid, from_pid, cards, is_private)
    }

    /// Record a player's keychain and wake the gate so it can re-check
    /// `all_keychains_committed`.
    pub async fn record_keychain(&self, player_pid: impl Into<PlayerId>, keychain: Keychain) {
        self.lock_store().record_keychain(player_pid, keychain);
        self.notify.notify_one();
    }

    /// The `gameanalyze` entry point: closes per-move intake, waits on the
    /// keychain gate, then runs verification and scoring. Returns the frozen
    /// `AnalysisResult`; the same value is broadcast on every transition via
    /// [`Analyzer::subscribe`].
    ///
    /// The gate's predicate only ever holds the store's mutex for the
    /// duration of one synchronous check (never across the `.await` inside
    /// `wait_for_all_committed`), so `record_keychain` calls racing the wait
    /// are never blocked out.
    #[instrument(skip(self))]
    pub async fn analyze(&self) -> AnalysisResult {
        self.emit(AnalyzerState::Analyzing, AnalysisResult::default());
        self.lock_store().close_per_move();
        info!(target: LOG_TARGET, "per-move intake closed, entering Analyzing");

        let gate_result = self
            .gate
            .wait_for_all_committed(&self.notify, || self.lock_store().all_keychains_committed())
            .await;

        if let Err(err) = gate_result {
            warn!(target: LOG_TARGET, error = %err, "gate failed, analysis failed");
            let result = AnalysisResult::failed(err);
            self.emit(AnalyzerState::Failed, result.clone());
            return result;
        }

        let transcript = {
            let mut store = self.lock_store();
            store.close_gate();
            store.transcript().clone()
        };
        info!(target: LOG_TARGET, "all keychains committed, entering Analyzed");
        self.emit(AnalyzerState::Analyzed, AnalysisResult::default());

        let outcome = async {
            let pool = verify_deck(&transcript, self.crypto.as_ref()).await?;
            verify_deals(&transcript, self.crypto.as_ref(), pool).await
        }
        .await;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(target: LOG_TARGET, error = %err, "verification failed, analysis failed");
                let result = AnalysisResult::failed(err);
                self.emit(AnalyzerState::Failed, result.clone());
                return result;
            }
        };

        let (hands, winners) =
            resolve_winners(&outcome.private_by_pid, &outcome.public, &transcript.roster);
        let result = AnalysisResult {
            private_by_pid: outcome.private_by_pid,
            public: outcome.public,
            hands,
            winners,
            complete: true,
            error: None,
        };
        info!(target: LOG_TARGET, winners = result.winners.len(), "scoring complete");
        self.emit(AnalyzerState::Scored, result.clone());
        result
    }
}

/// Convenience entry point for batch/offline auditing: verify and score an
/// already-complete transcript in one call, without driving it through the
/// event-callback/gate machinery above. Intended for callers that dump a
/// finished hand's transcript and want a one-shot verdict (e.g. a dispute
/// resolver replaying a settled hand), not for live capture during play.
///
/// Returns `anyhow::Result` rather than `AnalyzerError` because this is
/// outward-facing glue, not the core verification pipeline: a caller here
/// wants a readable chain of "what went wrong and where" more than a typed
/// enum to match on.
pub async fn audit_transcript(
    transcript: &Transcript,
    crypto: &dyn CryptoPrimitive,
) -> anyhow::Result<AnalysisResult> {
    if !transcript.all_keychains_committed() {
        anyhow::bail!("cannot audit an offline transcript with missing player keychains");
    }

    let pool = verify_deck(transcript, crypto)
        .await
        .context("deck re-encryption chain failed to verify")?;
    let outcome = verify_deals(transcript, crypto, pool)
        .await
        .context("selection/decryption replay failed to verify")?;

    let (hands, winners) =
        resolve_winners(&outcome.private_by_pid, &outcome.public, &transcript.roster);
    Ok(AnalysisResult {
        private_by_pid: outcome.private_by_pid,
        public: outcome.public,
        hands,
        winners,
        complete: true,
        error: None,
    })
}

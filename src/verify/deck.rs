//! C5: the deck verifier (§4.3). Replays the re-encryption chain over the
//! plaintext deck and proves the final snapshot matches what each player
//! actually committed.

use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::crypto::CryptoPrimitive;
use crate::domain::{Mapping, Transcript};
use crate::error::AnalyzerError;
use crate::multiset::multiset_eq;

/// Walks `transcript.snapshots` from stage 1 onward, re-encrypting the
/// previous stage under each contributor's final keypair and comparing the
/// result to the committed snapshot as a multiset. Returns the final,
/// canonical encrypted deck (`D_n`) on success.
#[instrument(skip_all)]
pub async fn verify_deck(
    transcript: &Transcript,
    crypto: &dyn CryptoPrimitive,
) -> Result<Vec<Mapping>, AnalyzerError> {
    if transcript.snapshots.is_empty() {
        return Err(AnalyzerError::Internal("no deck snapshots recorded".into()));
    }

    let mut previous = transcript.snapshots[0].cards.clone();

    for (stage, snapshot) in transcript.snapshots.iter().enumerate().skip(1) {
        let keychain = transcript.keychains.get(&snapshot.from_pid).ok_or_else(|| {
            AnalyzerError::Internal(format!("no keychain committed for {}", snapshot.from_pid))
        })?;
        let keypair = keychain.last().ok_or_else(|| {
            AnalyzerError::Internal(format!("{} committed an empty keychain", snapshot.from_pid))
        })?;

        // Batch: all n encryptions for this stage issue concurrently (§4.3).
        let computed: Vec<Mapping> =
            try_join_all(previous.iter().map(|x| crypto.encrypt(x, keypair))).await?;

        if !multiset_eq(&computed, &snapshot.cards) {
            return Err(AnalyzerError::DeckEncryptionMismatch {
                stage,
                offender: snapshot.from_pid.clone(),
            });
        }

        debug!(target: "poker_auditor::verify::deck", stage, from = %snapshot.from_pid, "stage verified");
        previous = snapshot.cards.clone();
    }

    Ok(previous)
}

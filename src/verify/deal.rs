//! C6: the deal verifier (§4.4). Replays each selecting player's sequence
//! of select/decrypt rows, resolves the terminal plaintext cards, and
//! enforces that every selected ciphertext is drawn from the shared
//! encrypted deck pool exactly once.
//!
//! Self-decryption semantics (§9 open question, resolved here): the
//! terminal entry of every sub-deal — whatever its kind — is finalized by
//! applying the *selecting player's own* final keypair to that entry's
//! cards. This subsumes the spec's explicit "(decrypt, decrypt) at the last
//! entry" case and extends uniformly to a sub-deal that ends on a select
//! (no intervening partial decryption) or on a single decrypt.

use std::collections::HashMap;

use futures::future::try_join_all;
use tracing::debug;

use crate::crypto::CryptoPrimitive;
use crate::domain::{Card, DealEntry, DealKind, Mapping, PlayerId, Transcript};
use crate::error::AnalyzerError;
use crate::multiset::{multiset_eq, multiset_remove};

#[derive(Default)]
pub struct DealOutcome {
    pub private_by_pid: HashMap<PlayerId, Vec<Card>>,
    pub public: Vec<Card>,
}

async fn decrypt_all(
    crypto: &dyn CryptoPrimitive,
    values: &[Mapping],
    keypair: &crate::domain::Keypair,
) -> Result<Vec<Mapping>, AnalyzerError> {
    try_join_all(values.iter().map(|v| crypto.decrypt(v, keypair))).await
}

fn resolve_cards(
    transcript: &Transcript,
    offender: &PlayerId,
    plaintexts: &[Mapping],
) -> Result<Vec<Card>, AnalyzerError> {
    plaintexts
        .iter()
        .map(|m| {
            transcript
                .registry
                .resolve(m)
                .cloned()
                .ok_or_else(|| AnalyzerError::NonMappingResult {
                    offender: offender.clone(),
                    value: m.clone(),
                })
        })
        .collect()
}

fn append_resolved(outcome: &mut DealOutcome, dealer_pid: &PlayerId, private: bool, cards: Vec<Card>) {
    if private {
        outcome
            .private_by_pid
            .entry(dealer_pid.clone())
            .or_default()
            .extend(cards);
    } else {
        outcome.public.extend(cards);
    }
}

/// Finalize a sub-deal's terminal entry by applying `dealer_pid`'s own final
/// keypair to `entry.cards`.
async fn finalize_self(
    transcript: &Transcript,
    crypto: &dyn CryptoPrimitive,
    dealer_pid: &PlayerId,
    entry: &DealEntry,
    outcome: &mut DealOutcome,
) -> Result<(), AnalyzerError> {
    let keychain = transcript.keychains.get(dealer_pid).ok_or_else(|| {
        AnalyzerError::Internal(format!("no keychain committed for {dealer_pid}"))
    })?;
    let keypair = keychain
        .last()
        .ok_or_else(|| AnalyzerError::Internal(format!("{dealer_pid} committed an empty keychain")))?;
    let plaintexts = decrypt_all(crypto, &entry.cards, keypair).await?;
    let cards = resolve_cards(transcript, dealer_pid, &plaintexts)?;
    append_resolved(outcome, dealer_pid, entry.private, cards);
    Ok(())
}

/// Verify one selecting player's deal list against the shared `pool`.
async fn verify_deal_list(
    transcript: &Transcript,
    crypto: &dyn CryptoPrimitive,
    dealer_pid: &PlayerId,
    entries: &[DealEntry],
    pool: &mut Vec<Mapping>,
    outcome: &mut DealOutcome,
) -> Result<(), AnalyzerError> {
    if entries.is_empty() {
        return Ok(());
    }

    let mut previous_kind = DealKind::Select; // sentinel: "awaiting a select"
    let mut previous_entry: Option<&DealEntry> = None;

    for (i, entry) in entries.iter().enumerate() {
        match (previous_kind, entry.kind) {
            (DealKind::Select, DealKind::Select) if i == 0 => {
                if !multiset_remove(pool, &entry.cards) {
                    return Err(AnalyzerError::SelectDuplicate {
                        offender: entry.from_pid.clone(),
                        dealer: dealer_pid.clone(),
                    });
                }
            }
            (DealKind::Select, DealKind::Select) => {
                return Err(AnalyzerError::ProtocolSequence {
                    dealer: dealer_pid.clone(),
                });
            }
            (DealKind::Select, DealKind::Decrypt) => {
                // Decryption chain begins; nothing to check until the next
                // transition (or the post-loop finalize if this is the
                // last entry).
            }
            (DealKind::Decrypt, DealKind::Select) => {
                // The prior sub-deal's penultimate decrypt is finalized by
                // the selecting player's own key before the new sub-deal's
                // select removes its cards from the pool.
                let prior = previous_entry.expect("decrypt implies a previous entry");
                finalize_self(transcript, crypto, dealer_pid, prior, outcome).await?;

                if !multiset_remove(pool, &entry.cards) {
                    return Err(AnalyzerError::SelectDuplicate {
                        offender: entry.from_pid.clone(),
                        dealer: dealer_pid.clone(),
                    });
                }
            }
            (DealKind::Decrypt, DealKind::Decrypt) => {
                let prior = previous_entry.expect("decrypt implies a previous entry");
                let sender_keychain = transcript.keychains.get(&entry.from_pid).ok_or_else(|| {
                    AnalyzerError::Internal(format!("no keychain committed for {}", entry.from_pid))
                })?;
                let sender_keypair = sender_keychain.last().ok_or_else(|| {
                    AnalyzerError::Internal(format!("{} committed an empty keychain", entry.from_pid))
                })?;
                let computed = decrypt_all(crypto, &prior.cards, sender_keypair).await?;
                if !multiset_eq(&computed, &entry.cards) {
                    return Err(AnalyzerError::IntermediateDecryptMismatch {
                        offender: entry.from_pid.clone(),
                        round: i,
                    });
                }
            }
        }
        previous_kind = entry.kind;
        previous_entry = Some(entry);
    }

    // The final sub-deal's terminal entry, whatever its kind, is finalized
    // by the selecting player's own key (see module doc).
    let last = previous_entry.expect("checked non-empty above");
    finalize_self(transcript, crypto, dealer_pid, last, outcome).await?;

    debug!(target: "poker_auditor::verify::deal", dealer = %dealer_pid, entries = entries.len(), "deal list verified");
    Ok(())
}

/// Verify every selecting player's deal list against `encrypted_deck_pool`
/// (the output of C5). Dealers are independent and may be processed in any
/// order; this walks them in the transcript's insertion order for
/// determinism.
pub async fn verify_deals(
    transcript: &Transcript,
    crypto: &dyn CryptoPrimitive,
    encrypted_deck_pool: Vec<Mapping>,
) -> Result<DealOutcome, AnalyzerError> {
    let mut pool = encrypted_deck_pool;
    let mut outcome = DealOutcome::default();

    for (dealer_pid, entries) in transcript.deals.iter() {
        verify_deal_list(transcript, crypto, dealer_pid, entries, &mut pool, &mut outcome).await?;
    }

    Ok(outcome)
}

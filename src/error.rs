//! Error taxonomy (§7). Each variant carries the enough context to name the
//! offending player and round, plus a stable numeric `code` for callers that
//! want to switch on failure class rather than match the enum.

use thiserror::Error;

use crate::domain::{Mapping, PlayerId};

#[derive(Debug, Clone, Error, serde::Serialize)]
pub enum AnalyzerError {
    #[error("not all players committed a keychain before the deadline")]
    KeychainTimeout,

    #[error("deck re-encryption at stage {stage} disagrees with the committed snapshot (offender: {offender})")]
    DeckEncryptionMismatch { stage: usize, offender: PlayerId },

    #[error("{offender} selected a ciphertext already drawn from the deck (dealer: {dealer})")]
    SelectDuplicate { offender: PlayerId, dealer: PlayerId },

    #[error("disallowed deal-sequence transition for dealer {dealer}")]
    ProtocolSequence { dealer: PlayerId },

    #[error("partial decryption by {offender} is inconsistent with the prior round {round}")]
    IntermediateDecryptMismatch { offender: PlayerId, round: usize },

    #[error("final decryption result {value} by {offender} does not resolve to a card")]
    NonMappingResult { offender: PlayerId, value: Mapping },

    /// A scoring-stage invariant was violated. Verification passed, so this
    /// should be unreachable; surfaced rather than panicking.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl AnalyzerError {
    /// The stable numeric code from §7.
    pub fn code(&self) -> u8 {
        match self {
            AnalyzerError::KeychainTimeout => 0,
            AnalyzerError::DeckEncryptionMismatch { .. } => 1,
            AnalyzerError::SelectDuplicate { .. }
            | AnalyzerError::ProtocolSequence { .. }
            | AnalyzerError::IntermediateDecryptMismatch { .. }
            | AnalyzerError::NonMappingResult { .. } => 2,
            AnalyzerError::Internal(_) => 255,
        }
    }
}

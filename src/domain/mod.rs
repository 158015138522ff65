//! Core domain types for the auditor: cards, keys, players, and the
//! transcript shapes the verification pipeline reads.

pub mod card;
pub mod deal;
pub mod deck;
pub mod keys;
pub mod player;
pub mod transcript;

pub use card::{Card, CardRegistry, Suit};
pub use deal::{DealEntry, DealKind};
pub use deck::DeckSnapshot;
pub use keys::{Keychain, Keypair};
pub use player::{Player, Roster};
pub use transcript::{AnalysisResult, Transcript, WinnerEntry};

/// Opaque large-integer string identifying a player. Never parsed, only compared.
pub type PlayerId = String;

/// An opaque plaintext residue or ciphertext value, typically a large-integer
/// string encoding a quadratic residue mod a shared prime. The same
/// representation carries both plaintext card mappings and SRA ciphertexts;
/// which one a given value is depends on where in the transcript it sits, not
/// on anything the type itself records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Mapping(pub String);

impl Mapping {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Mapping {
    fn from(s: String) -> Self {
        Mapping(s)
    }
}

impl From<&str> for Mapping {
    fn from(s: &str) -> Self {
        Mapping(s.to_owned())
    }
}

impl std::fmt::Display for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

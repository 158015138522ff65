//! C1: the commutative-encryption capability. The verifier depends only on
//! this trait; the concrete SRA primitive is an external collaborator in
//! production (§1 Non-goals: "implementing the underlying modular
//! arithmetic primitive (only invoking it)"). A reference implementation is
//! provided behind `#[cfg(test)]` so fixtures can build real, checkable
//! transcripts instead of hand-waving encrypted values.

use async_trait::async_trait;

use crate::domain::{Keypair, Mapping};
use crate::error::AnalyzerError;

/// `encrypt`/`decrypt` of a single opaque value under one keypair (§6).
/// Implementations must be commutative and deterministic:
/// `E_a(E_b(x)) == E_b(E_a(x))` and `D_a(E_a(x)) == x`.
#[async_trait]
pub trait CryptoPrimitive: Send + Sync {
    async fn encrypt(&self, value: &Mapping, keypair: &Keypair) -> Result<Mapping, AnalyzerError>;
    async fn decrypt(&self, value: &Mapping, keypair: &Keypair) -> Result<Mapping, AnalyzerError>;
}

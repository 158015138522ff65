//! Auditor-wide tunables.

use std::time::Duration;

/// Configuration for one Analyzer instance. Cheap to construct; not a
/// file-backed loader because nothing in this crate's scope is deployment
/// configurable (no transport, no persistence) beyond this one timeout.
#[derive(Clone, Copy, Debug)]
pub struct AnalyzerConfig {
    /// How long the keychain-commit coordinator (C4) waits for every
    /// player's keychain before declaring `KeychainTimeout` (§4.2).
    pub keychain_commit_timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            keychain_commit_timeout: Duration::from_millis(10_000),
        }
    }
}

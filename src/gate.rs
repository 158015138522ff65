//! C4: the keychain-commit coordinator. Arms a single timer when the
//! façade enters `Analyzing`; each `record_keychain` call wakes the gate to
//! re-check `all_keychains_committed`. First of "all committed" or "timer
//! fires" wins (§4.2, §5 cancellation).

use std::time::Duration;

use tokio::sync::Notify;
use tracing::{info, warn};

use crate::error::AnalyzerError;

pub struct KeychainGate {
    timeout: Duration,
}

impl KeychainGate {
    pub fn new(timeout: Duration) -> Self {
        KeychainGate { timeout }
    }

    /// Suspend until `is_committed()` is true (re-checked every time
    /// `notify` fires, i.e. every `record_keychain` call) or `timeout`
    /// elapses first. Exactly one of the two outcomes occurs; there is no
    /// cancellation path other than the timer (§5).
    pub async fn wait_for_all_committed(
        &self,
        notify: &Notify,
        mut is_committed: impl FnMut() -> bool,
    ) -> Result<(), AnalyzerError> {
        if is_committed() {
            return Ok(());
        }
        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => {
                    warn!(target: "poker_auditor::gate", timeout_ms = self.timeout.as_millis() as u64, "keychain commit timeout fired");
                    return Err(AnalyzerError::KeychainTimeout);
                }
                _ = notify.notified() => {
                    if is_committed() {
                        info!(target: "poker_auditor::gate", "all keychains committed, closing gate");
                        return Ok(());
                    }
                }
            }
        }
    }
}

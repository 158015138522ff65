//! Optional tracing-subscriber wiring. The library never installs a global
//! subscriber on its own; callers (binaries, tests) opt in.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a human-readable `fmt` subscriber filtered by `RUST_LOG`
/// (defaulting to `info`). Safe to call more than once; later calls are
/// no-ops if a global subscriber is already set.
pub fn install_fmt_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}

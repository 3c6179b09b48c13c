//! Logging setup for pipeline runs.
//!
//! Installs a global tracing subscriber reading its filter from `RUST_LOG`,
//! defaulting to `info`. Safe to call more than once; only the first call
//! installs anything.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize the global tracing subscriber.
pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // Ignore failure: a host application may have installed its own
        // subscriber already.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::init;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}

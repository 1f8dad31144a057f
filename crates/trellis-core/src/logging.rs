//! Logging bootstrap for Trellis.

use tracing_subscriber::EnvFilter;

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global tracing subscriber.
///
/// # Panics
///
/// Panics if a global subscriber is already installed. Use [`try_init`]
/// from tests or embedding code that may run more than once.
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(filter()).init();
    tracing::debug!("tracing subscriber installed");
}

/// Install the global tracing subscriber, returning `false` if one is
/// already installed.
pub fn try_init() -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("tracing subscriber installed");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_only_installs_once() {
        assert!(try_init());
        assert!(!try_init());
    }
}

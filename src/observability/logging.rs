//! Structured logging.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crate target used in the fallback filter.
const CRATE_TARGET: &str = "qr_ledger";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence; otherwise this crate logs at `level`.
/// Calling twice is harmless, the second install is ignored.
pub fn init(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(level)))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn fallback_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("{}={},tower_http=info", CRATE_TARGET, level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_filter_names_crate() {
        let filter = fallback_filter("debug").to_string();
        assert!(filter.contains("qr_ledger=debug"));
    }

    #[test]
    fn test_init_twice() {
        init("info");
        init("debug");
    }
}

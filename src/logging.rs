//! Structured logging setup
//!
//! Human-readable or JSON lines, always on stderr so command output on
//! stdout (for example `dashboard --json`) stays machine-readable.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "vitalpath=debug"
    } else {
        "vitalpath=info"
    }
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`.
///
/// # Examples
///
/// ```no_run
/// use vitalpath::logging::init_logging;
///
/// init_logging(false, true).unwrap();
/// tracing::info!("ready");
/// ```
pub fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter(verbose)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .with_target(verbose)
            .with_level(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "vitalpath=info");
        assert_eq!(default_filter(true), "vitalpath=debug");
        assert!(EnvFilter::try_new(default_filter(true)).is_ok());
    }
}

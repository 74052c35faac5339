// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// The directive used when `RUST_LOG` is unset: `info` everywhere, with the
/// oracle module's lifecycle events at `debug`.
pub const DEFAULT_DIRECTIVES: &str = "info,oracle=debug";

/// Installs the global JSON `tracing` subscriber with [`DEFAULT_DIRECTIVES`].
///
/// Records emitted through the `log` crate (the sandbox uses it) are forwarded
/// to the same subscriber.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    init_tracing_with(DEFAULT_DIRECTIVES)
}

/// Installs the global JSON `tracing` subscriber. `RUST_LOG` takes precedence
/// over `default_directives`.
pub fn init_tracing_with(default_directives: &str) -> Result<(), anyhow::Error> {
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let subscriber = Registry::default()
        .with(env_filter(default_directives)?)
        .with(fmt_layer);
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn env_filter(default_directives: &str) -> Result<EnvFilter, anyhow::Error> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(default_directives)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        assert!(EnvFilter::try_new(DEFAULT_DIRECTIVES).is_ok());
    }

    #[test]
    fn malformed_default_is_an_error_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(env_filter("oracle=notalevel").is_err());
        }
    }
}

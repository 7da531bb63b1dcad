//! Tracing bootstrap for the scoring service. The filter comes from
//! `RUST_LOG` when set; otherwise the configured level applies to the
//! scoring pipeline while the embedded HTTP stack is held at `warn`.

use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug)]
pub enum TelemetryError {
    Filter {
        directives: String,
        source: ParseError,
    },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::Filter { directives, .. } => {
                write!(f, "invalid tracing directives '{directives}'")
            }
            TelemetryError::Init(err) => write!(f, "tracing init failed: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::Filter { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Init)
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            let directives = scoped_directives(&config.log_level);
            EnvFilter::try_new(&directives).map_err(|source| TelemetryError::Filter {
                directives,
                source,
            })
        }
    }
}

/// Configured level for this crate's modules; transport internals stay quiet
/// so a `debug` run surfaces scoring events, not connection churn.
fn scoped_directives(level: &str) -> String {
    format!("{level},hyper=warn,mio=warn")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn scoped_directives_quiet_the_transport() {
        assert_eq!(scoped_directives("debug"), "debug,hyper=warn,mio=warn");
    }

    #[test]
    fn configured_level_feeds_the_filter_when_rust_log_is_unset() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "trace".to_string(),
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn malformed_level_is_rejected_with_the_directives_echoed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "definitely not a level".to_string(),
        };
        match build_filter(&config) {
            Err(TelemetryError::Filter { directives, .. }) => {
                assert!(directives.starts_with("definitely not a level"));
            }
            other => panic!("expected filter error, got {other:?}"),
        }
    }
}

//! Tracing bootstrap for services embedding the engine.
//!
//! The engine crates only emit `tracing` events; installing a subscriber is
//! left to the host process, which can call [`init_tracing`] once at startup.

use std::env;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directives read from this variable take precedence over defaults.
pub const LOG_ENV: &str = "HIREFLOW_LOG";
/// `json` selects the JSON formatter; anything else is compact text.
pub const LOG_FORMAT_ENV: &str = "HIREFLOW_LOG_FORMAT";

/// Install a global subscriber configured from the environment.
///
/// Returns `false` when a global subscriber was already installed, which
/// makes repeated calls from tests harmless.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "hireflow_core=debug,hireflow_dag=debug,info"
        } else {
            "hireflow_core=info,hireflow_dag=info,warn"
        })
    });

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_ansi(false))
            .try_init()
            .is_ok(),
        _ => registry.with(fmt::layer().compact()).try_init().is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn second_init_is_a_no_op() {
        let _ = init_tracing();
        assert!(!init_tracing());
        tracing::info!("tracing initialized twice without panicking");
    }
}

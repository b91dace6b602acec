//! Folio CLI Library
//!
//! Command implementations for the Folio binary, exposed as a library so
//! they can be exercised from tests.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (check, build, list, new)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use folio::cmd;
//!
//! // Validate every collection and write the manifest
//! cmd::build::run(Path::new("folio.toml"), None, false).unwrap();
//! ```

pub mod cmd;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
pub use folio_collector::{Collection, ContentCollector};
pub use folio_core::Config;

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Load the configuration, falling back to defaults when the file is absent.
/// `FOLIO__*` environment variables override file values.
pub fn load_config(config_path: &Path) -> Result<Config> {
    let config = Config::load_with_env(config_path)
        .wrap_err_with(|| format!("Failed to load configuration: {}", config_path.display()))?;

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

//! Configuration loading from the process environment and arguments.

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{normalize_config, validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bad flag or environment value, including an unparseable rate limit.
    /// Also carries `--help` / `--version` requests.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse, normalise and validate the configuration.
pub fn load_config() -> Result<ServiceConfig, ConfigError> {
    load_config_from(std::env::args_os())
}

/// Same as [`load_config`] with explicit arguments. Environment variables
/// are still consulted for anything not given as a flag.
pub fn load_config_from<I, T>(args: I) -> Result<ServiceConfig, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    use clap::Parser;

    let config = normalize_config(ServiceConfig::try_parse_from(args)?);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

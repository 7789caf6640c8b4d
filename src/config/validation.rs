//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic checks that clap's parsing cannot express
//! - Normalise values (an empty `ALLOWED_USER_AGENT` disables the gate)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before the configuration is accepted into the system

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request timeout must be at least one second")]
    ZeroRequestTimeout,

    #[error("metrics address {0} collides with the HTTP bind address")]
    MetricsAddressInUse(std::net::SocketAddr),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if let Some(metrics) = config.metrics_address {
        if metrics.port() == config.bind_address.port()
            && (metrics.ip() == config.bind_address.ip()
                || metrics.ip().is_unspecified()
                || config.bind_address.ip().is_unspecified())
        {
            errors.push(ValidationError::MetricsAddressInUse(metrics));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Apply normalisation rules that never fail.
pub fn normalize_config(mut config: ServiceConfig) -> ServiceConfig {
    config.allowed_user_agent = config.allowed_user_agent.filter(|ua| !ua.is_empty());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&ServiceConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let config = ServiceConfig {
            request_timeout_secs: 0,
            metrics_address: Some("127.0.0.1:8080".parse().unwrap()),
            ..ServiceConfig::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
    }

    #[test]
    fn separate_metrics_port_is_accepted() {
        let config = ServiceConfig {
            metrics_address: Some("0.0.0.0:9090".parse().unwrap()),
            ..ServiceConfig::default()
        };
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn empty_user_agent_disables_the_gate() {
        let config = normalize_config(ServiceConfig {
            allowed_user_agent: Some(String::new()),
            ..ServiceConfig::default()
        });
        assert!(config.allowed_user_agent.is_none());

        let config = normalize_config(ServiceConfig {
            allowed_user_agent: Some("oidc-client".into()),
            ..ServiceConfig::default()
        });
        assert_eq!(config.allowed_user_agent.as_deref(), Some("oidc-client"));
    }
}

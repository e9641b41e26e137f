//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every route of every profile so bad rules fail at load time
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate patterns
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{Mode, ProxyConfig};
use crate::routing::{Route, RouteError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{mode} route #{index}: {source}")]
    InvalidRoute {
        mode: Mode,
        index: usize,
        #[source]
        source: RouteError,
    },

    #[error("{mode} pattern '{pattern}' is defined more than once")]
    DuplicatePattern { mode: Mode, pattern: String },

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),

    #[error("src_dir must not be empty")]
    EmptySrcDir,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if config.src_dir.trim().is_empty() {
        errors.push(ValidationError::EmptySrcDir);
    }

    for mode in [Mode::Development, Mode::Production] {
        validate_routes(config, mode, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(config: &ProxyConfig, mode: Mode, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();

    for (index, route) in config.profile(mode).routes.iter().enumerate() {
        if let Err(source) = Route::compile(route) {
            errors.push(ValidationError::InvalidRoute {
                mode,
                index,
                source,
            });
        }

        if !seen.insert(route.pattern.as_str()) {
            errors.push(ValidationError::DuplicatePattern {
                mode,
                pattern: route.pattern.clone(),
            });
        }
    }
}

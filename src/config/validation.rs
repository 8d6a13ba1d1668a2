//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics. All violations are
//! collected so an operator fixes a broken file in one pass.

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::{GatewayConfig, PLACEHOLDER_ADMIN_KEY};

/// A single semantic configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, returning every violation found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_http_url(&mut errors, "upstream.base_url", &config.upstream.base_url);
    check_http_url(&mut errors, "upstream.app_url", &config.upstream.app_url);
    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be greater than 0"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    for status in &config.responses.passthrough_statuses {
        if !(400..500).contains(status) {
            errors.push(ValidationError::new(
                "responses.passthrough_statuses",
                format!("{} is not a 4xx status", status),
            ));
        }
    }

    if config.auth.cookie_name.trim().is_empty() {
        errors.push(ValidationError::new("auth.cookie_name", "must not be empty"));
    }

    if matches!(&config.auth.jwt_secret, Some(secret) if secret.is_empty()) {
        errors.push(ValidationError::new("auth.jwt_secret", "must not be empty when set"));
    }

    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.admin.enabled {
        check_addr(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key.is_empty() || config.admin.api_key == PLACEHOLDER_ADMIN_KEY {
            errors.push(ValidationError::new(
                "admin.api_key",
                "must be set to a real key when admin is enabled",
            ));
        }
    }

    if config.demo.onboarding_enabled {
        if config.demo.max_sessions == 0 {
            errors.push(ValidationError::new("demo.max_sessions", "must be greater than 0"));
        }
        if config.demo.session_ttl_secs == 0 {
            errors.push(ValidationError::new("demo.session_ttl_secs", "must be greater than 0"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e))),
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(field, format!("invalid socket address '{}'", value)));
    }
}

//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming the backend base URL.
pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
/// Environment variable naming this deployment's public URL.
pub const ENV_APP_URL: &str = "APP_URL";
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_ADMIN_API_KEY: &str = "ADMIN_API_KEY";
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without environment overrides or validation.
pub fn read_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables on top of file values.
///
/// `lookup` is injected so tests do not touch the process environment.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty(ENV_BACKEND_URL) {
        config.upstream.base_url = v;
    }
    if let Some(v) = non_empty(ENV_APP_URL) {
        config.upstream.app_url = v;
    }
    if let Some(v) = non_empty(ENV_JWT_SECRET) {
        config.auth.jwt_secret = Some(v);
    }
    if let Some(v) = non_empty(ENV_ADMIN_API_KEY) {
        config.admin.api_key = v;
    }
    if let Some(v) = non_empty(ENV_BIND_ADDRESS) {
        config.listener.bind_address = v;
    }
}

/// Load configuration: optional TOML file, then environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

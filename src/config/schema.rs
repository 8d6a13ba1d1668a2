//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Placeholder admin key shipped in the defaults. Rejected by validation
/// when the admin listener is enabled.
pub const PLACEHOLDER_ADMIN_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

/// Root configuration for the dashboard gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// External backend the API routes forward to.
    pub upstream: UpstreamConfig,

    /// Inbound credential handling.
    pub auth: AuthConfig,

    /// Upstream response translation policy.
    pub responses: ResponseConfig,

    /// Security hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Operator API.
    pub admin: AdminConfig,

    /// Demo-only routes.
    pub demo: DemoConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Authorization header scheme used towards the backend.
///
/// Exactly one scheme is used per deployment. `Jwt` exists for backends that
/// have not finished moving off the legacy `JWT <token>` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum AuthScheme {
    #[default]
    Bearer,
    #[serde(rename = "JWT")]
    Jwt,
}

impl AuthScheme {
    /// Header prefix without the trailing space.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Jwt => "JWT",
        }
    }
}

/// External backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Backend base URL; route suffixes are appended to it.
    pub base_url: String,

    /// Public URL of this deployment, used for absolute callback URLs.
    pub app_url: String,

    /// Scheme of the outgoing Authorization header.
    pub auth_scheme: AuthScheme,

    /// Total transport ceiling for one upstream call in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            app_url: "http://localhost:3000".to_string(),
            auth_scheme: AuthScheme::Bearer,
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// Inbound credential configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Session cookie carrying the access token.
    pub cookie_name: String,

    /// HS256 secret. When unset only structure and expiry are checked.
    pub jwt_secret: Option<String>,

    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "access_token".to_string(),
            jwt_secret: None,
            leeway_secs: 0,
        }
    }
}

/// Upstream response translation policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Non-2xx upstream statuses relayed as-is. Everything else becomes 500.
    pub passthrough_statuses: Vec<u16>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            passthrough_statuses: vec![400, 403],
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the admin listener.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin listener bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_ADMIN_KEY.to_string(),
            bind_address: "127.0.0.1:3001".to_string(),
        }
    }
}

/// Demo-only features.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Mount the in-memory onboarding workflow routes. Off unless asked for.
    pub onboarding_enabled: bool,

    /// Live sessions kept before new ones are refused.
    pub max_sessions: usize,

    /// Idle time after which a session is dropped.
    pub session_ttl_secs: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            onboarding_enabled: false,
            max_sessions: 1_000,
            session_ttl_secs: 3_600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.upstream.auth_scheme, AuthScheme::Bearer);
        assert_eq!(config.responses.passthrough_statuses, vec![400, 403]);
        assert_eq!(config.auth.cookie_name, "access_token");
        assert!(config.auth.jwt_secret.is_none());
        assert!(!config.demo.onboarding_enabled);
        assert_eq!(config.demo.max_sessions, 1_000);
    }

    #[test]
    fn test_partial_sections() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "https://api.example.com"
            auth_scheme = "JWT"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.base_url, "https://api.example.com");
        assert_eq!(config.upstream.auth_scheme, AuthScheme::Jwt);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}

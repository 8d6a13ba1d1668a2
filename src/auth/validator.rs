//! Credential liveness checks.

use jsonwebtoken::{decode, errors::Error as JwtError, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::auth::token::Credential;
use crate::config::AuthConfig;

/// Claims the gateway cares about. The backend owns the rest.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry (seconds since epoch).
    pub exp: u64,
    /// Subject, when the issuer sets one.
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

/// Decides whether a credential is usable for an upstream call.
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let key = match &config.jwt_secret {
            Some(secret) => DecodingKey::from_secret(secret.as_bytes()),
            None => {
                // Structure and expiry only; the backend verifies signatures.
                validation.insecure_disable_signature_validation();
                DecodingKey::from_secret(&[])
            }
        };

        Self { key, validation }
    }

    /// Decode and check a credential.
    pub fn validate(&self, credential: &Credential) -> Result<TokenClaims, JwtError> {
        decode::<TokenClaims>(credential.as_str(), &self.key, &self.validation).map(|data| data.claims)
    }

    /// `true` only for a present, well-formed, unexpired credential.
    pub fn is_usable(&self, credential: Option<&Credential>) -> bool {
        let Some(credential) = credential else {
            return false;
        };

        match self.validate(credential) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(reason = %e, "Rejected credential");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn mint(exp: u64, secret: &str) -> Credential {
        let token = encode(
            &Header::default(),
            &json!({ "exp": exp, "user_id": 42, "token_type": "access" }),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        Credential::new(token).unwrap()
    }

    #[test]
    fn test_absent_is_unusable() {
        let validator = TokenValidator::new(&AuthConfig::default());
        assert!(!validator.is_usable(None));
    }

    #[test]
    fn test_liveness_without_secret() {
        let validator = TokenValidator::new(&AuthConfig::default());
        assert!(validator.is_usable(Some(&mint(now() + 600, "whatever"))));
        assert!(!validator.is_usable(Some(&mint(now() - 600, "whatever"))));
    }

    #[test]
    fn test_malformed_is_unusable() {
        let validator = TokenValidator::new(&AuthConfig::default());
        for raw in ["garbage", "a.b.c", "eyJhbGciOiJIUzI1NiJ9.bm90LWpzb24.sig"] {
            assert!(!validator.is_usable(Some(&Credential::new(raw).unwrap())), "{raw}");
        }
    }

    #[test]
    fn test_missing_exp_is_unusable() {
        let token = encode(
            &Header::default(),
            &json!({ "user_id": 1 }),
            &EncodingKey::from_secret(b"k"),
        )
        .unwrap();
        let validator = TokenValidator::new(&AuthConfig::default());
        assert!(!validator.is_usable(Some(&Credential::new(token).unwrap())));
    }

    #[test]
    fn test_signature_checked_with_secret() {
        let config = AuthConfig {
            jwt_secret: Some("server-secret".into()),
            ..AuthConfig::default()
        };
        let validator = TokenValidator::new(&config);
        assert!(validator.is_usable(Some(&mint(now() + 600, "server-secret"))));
        assert!(!validator.is_usable(Some(&mint(now() + 600, "forged"))));
    }

    #[test]
    fn test_leeway() {
        let config = AuthConfig {
            leeway_secs: 120,
            ..AuthConfig::default()
        };
        let validator = TokenValidator::new(&config);
        assert!(validator.is_usable(Some(&mint(now() - 30, "k"))));
    }
}

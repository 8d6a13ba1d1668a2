//! Exhaustive validation of inbound request bodies and path parameters.
//!
//! Envelopes are plain serde structs deriving [`Validate`]. Every declared
//! field must be optional at the serde level (`Option<T>` plus
//! `#[validate(required)]` when mandatory) so each field can be decoded on
//! its own. That is what lets type errors on several fields be reported
//! together instead of serde stopping at the first one.

use std::collections::{BTreeMap, HashMap};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Longest accepted path parameter.
pub const MAX_PATH_PARAM_LEN: usize = 128;

/// One violated constraint, reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Anything usable as a request envelope.
pub trait Envelope: DeserializeOwned + Serialize + Validate {}

impl<T: DeserializeOwned + Serialize + Validate> Envelope for T {}

/// Parse and validate `raw` as `T`.
///
/// Returns one issue per violated field, sorted by field name. Unknown
/// fields are ignored. An empty body is treated as `{}`.
pub fn validate_body<T: Envelope>(raw: &[u8]) -> Result<T, Vec<FieldIssue>> {
    let value: Value = if raw.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(raw)
            .map_err(|e| vec![FieldIssue::new("body", "invalid_json", e.to_string())])?
    };

    let Value::Object(object) = value else {
        return Err(vec![FieldIssue::new(
            "body",
            "invalid_type",
            "expected a JSON object",
        )]);
    };

    // Field name → issue; BTreeMap keeps one entry per field, ordered.
    let mut issues: BTreeMap<String, FieldIssue> = BTreeMap::new();
    let mut accepted = Map::new();

    for (key, field_value) in object {
        let single = Value::Object(Map::from_iter([(key.clone(), field_value.clone())]));
        match serde_json::from_value::<T>(single) {
            Ok(_) => {
                accepted.insert(key, field_value);
            }
            Err(e) => {
                let message = e.to_string();
                let code = if message.starts_with("unknown variant") {
                    "invalid_choice"
                } else {
                    "invalid_type"
                };
                issues.insert(key.clone(), FieldIssue::new(key, code, message));
            }
        }
    }

    let envelope = match serde_json::from_value::<T>(Value::Object(accepted)) {
        Ok(envelope) => envelope,
        Err(e) => {
            issues.insert("body".into(), FieldIssue::new("body", "invalid", e.to_string()));
            return Err(issues.into_values().collect());
        }
    };

    if let Err(errors) = envelope.validate() {
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            if issues.contains_key(&field) {
                continue;
            }
            if let Some(first) = field_errors.first() {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", first.code));
                issues.insert(field.clone(), FieldIssue::new(field, first.code.to_string(), message));
            }
        }
    }

    if issues.is_empty() {
        Ok(envelope)
    } else {
        Err(issues.into_values().collect())
    }
}

/// Validate `raw` as `T` and re-serialise the typed envelope.
///
/// Monomorphised instances are stored as plain function pointers in the
/// route table. Only declared fields survive the round trip.
pub fn validate_to_value<T: Envelope>(raw: &[u8]) -> Result<Value, Vec<FieldIssue>> {
    let envelope = validate_body::<T>(raw)?;
    serde_json::to_value(&envelope)
        .map_err(|e| vec![FieldIssue::new("body", "invalid", e.to_string())])
}

/// Path parameters are spliced into upstream URLs, so they are restricted to
/// identifier characters.
pub fn validate_path_params(params: &HashMap<String, String>) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = params
        .iter()
        .filter_map(|(name, value)| {
            let field = format!("path.{}", name);
            if value.is_empty() {
                Some(FieldIssue::new(field, "required", "must not be empty"))
            } else if value.len() > MAX_PATH_PARAM_LEN {
                Some(FieldIssue::new(
                    field,
                    "length",
                    format!("must be at most {} characters", MAX_PATH_PARAM_LEN),
                ))
            } else if !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                Some(FieldIssue::new(
                    field,
                    "invalid_format",
                    "may only contain letters, digits, '-' and '_'",
                ))
            } else {
                None
            }
        })
        .collect();
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::envelopes::{InvitationCreate, MembershipRole, RegisterRequest, WorkspaceRequest};
    use serde_json::json;

    fn fields(issues: &[FieldIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.field.as_str()).collect()
    }

    #[test]
    fn test_valid_body_drops_unknown_fields() {
        let raw = br#"{"name": "Acme Tax", "plan": "gold"}"#;
        let value = validate_to_value::<WorkspaceRequest>(raw).unwrap();
        assert_eq!(value, json!({ "name": "Acme Tax" }));
    }

    #[test]
    fn test_collects_every_violation() {
        let raw = br#"{"workspace": 5, "email": "nope", "role": "owner", "extra": true}"#;
        let issues = validate_body::<InvitationCreate>(raw).unwrap_err();
        assert_eq!(fields(&issues), vec!["email", "role", "workspace"]);
        assert_eq!(issues[1].code, "invalid_choice");
        assert_eq!(issues[2].code, "invalid_type");
    }

    #[test]
    fn test_empty_body_reports_required_fields() {
        let issues = validate_body::<RegisterRequest>(b"").unwrap_err();
        assert_eq!(fields(&issues), vec!["email", "password"]);
        assert!(issues.iter().all(|i| i.code == "required"));
    }

    #[test]
    fn test_malformed_json_is_single_issue() {
        let issues = validate_body::<WorkspaceRequest>(b"{\"name\": ").unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "body");
        assert_eq!(issues[0].code, "invalid_json");

        let issues = validate_body::<WorkspaceRequest>(b"[1, 2]").unwrap_err();
        assert_eq!(issues[0].code, "invalid_type");
    }

    #[test]
    fn test_typed_output() {
        let envelope: InvitationCreate =
            validate_body(br#"{"workspace": "ws_1", "email": "a@b.co", "role": "admin"}"#).unwrap();
        assert_eq!(envelope.role, Some(MembershipRole::Admin));
    }

    #[test]
    fn test_path_params() {
        let params = HashMap::from([
            ("workspace_id".to_string(), "ws_1".to_string()),
            ("membership_id".to_string(), "..".to_string()),
            ("chat_id".to_string(), "x".repeat(MAX_PATH_PARAM_LEN + 1)),
        ]);
        let issues = validate_path_params(&params);
        assert_eq!(fields(&issues), vec!["path.chat_id", "path.membership_id"]);
        assert_eq!(issues[0].code, "length");
        assert_eq!(issues[1].code, "invalid_format");
    }
}

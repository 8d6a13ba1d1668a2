//! Inbound request validation.
//!
//! # Design Decisions
//! - Exhaustive: every violated field is reported in one response
//! - Permissive input: unknown fields are ignored, never rejected
//! - Strict output: only declared fields are forwarded upstream

pub mod envelope;
pub mod envelopes;

pub use envelope::{validate_body, validate_path_params, validate_to_value, Envelope, FieldIssue};

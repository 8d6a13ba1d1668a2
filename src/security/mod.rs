//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → http::request (bounded body read, 413 over the limit)
//!     → auth (credential check on protected routes)
//! Outgoing response:
//!     → headers.rs (nosniff, frame denial, referrer and cache policy)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a credential that cannot be checked is rejected
//! - No trust in client input: bodies are re-serialised from validated fields

pub mod headers;

pub use headers::with_security_headers;

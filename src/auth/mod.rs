//! Caller authentication.
//!
//! # Data Flow
//! ```text
//! Inbound request headers
//!     → token.rs (Authorization header or session cookie → Credential)
//!     → validator.rs (JWT structure + expiry → usable / not usable)
//! ```
//!
//! Neither step fails loudly: an anonymous or expired caller is an expected
//! outcome, and the proxy pipeline turns it into a 401.

pub mod token;
pub mod validator;

pub use token::{access_token, Credential};
pub use validator::{TokenClaims, TokenValidator};

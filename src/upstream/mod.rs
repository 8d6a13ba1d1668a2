//! Upstream (external backend) forwarding.
//!
//! # Data Flow
//! ```text
//! validated route + params + envelope
//!     → types.rs (UpstreamRequest, base URL + suffix concatenation)
//!     → client.rs (reqwest call with credential + request ID)
//!     → UpstreamResponse (status + raw body) or UpstreamError
//! ```

pub mod client;
pub mod types;

pub use client::HttpUpstream;
pub use types::{upstream_url, Upstream, UpstreamError, UpstreamRequest, UpstreamResponse};

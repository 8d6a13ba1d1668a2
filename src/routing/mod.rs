//! Route table for the dashboard API.
//!
//! # Data Flow
//! ```text
//! catalog.rs (static list of ProxyRoute)
//!     → http::server groups entries by path
//!     → http::proxy::with_auth_proxy turns each entry into a handler
//! ```
//!
//! # Design Decisions
//! - Routes are data, not code: adding an endpoint is one table entry
//! - Inbound and upstream paths share `{param}` names
//! - Body schemas are monomorphised validators stored as fn pointers

pub mod catalog;
pub mod route;

pub use catalog::catalog;
pub use route::{Access, BodySchema, Callback, HttpMethod, ProxyRoute, RouteInfo};

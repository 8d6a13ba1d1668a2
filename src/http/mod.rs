//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → proxy.rs (token check → validation → forward)
//!     → response.rs (upstream status/body → dashboard envelope)
//!     → error.rs (gateway-originated failures)
//!     → Send to client
//! ```

pub mod error;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use proxy::{with_auth_proxy, Stage};
pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer, ServerError};

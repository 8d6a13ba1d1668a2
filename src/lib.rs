//! Authenticated backend proxy for the tax-practice console.

pub mod admin;
pub mod auth;
pub mod config;
pub mod demo;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;
pub mod validation;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

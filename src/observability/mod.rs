//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http::proxy pipeline
//!     → logging.rs (structured events keyed by request ID)
//!     → metrics.rs (counters and histograms per route)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;

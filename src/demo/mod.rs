//! Demo-only features.
//!
//! Nothing here is durable. State goes through the [`store::SessionStore`]
//! seam so a real store can replace [`store::MemoryStore`].

pub mod onboarding;
pub mod store;

pub use store::{MemoryStore, SessionStore, StoreError};

//! Server crate for the CineSmart recommendation engine.
//!
//! This crate wires the components together: environment configuration,
//! the shared application context, and the search service that combines
//! similarity recommendations with metadata lookups.

pub mod config;
pub mod context;
pub mod service;

pub use config::AppConfig;
pub use context::AppContext;
pub use service::{SearchHit, SearchService};

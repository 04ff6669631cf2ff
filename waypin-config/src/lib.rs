//! Shared configuration library for waypin.
//!
//! Centralizes config loading/validation and tracing initialization so every
//! waypin consumer reads the same defaults, file format, and env overrides.

pub mod bootstrap;
pub mod loader;
pub mod logging;
pub mod models;

pub use bootstrap::build_collection_service;
pub use loader::{ConfigLoadError, load, load_from_path, load_from_str};
pub use logging::init_tracing;
pub use models::{ApiConfig, CacheConfig, Config, SearchConfig};

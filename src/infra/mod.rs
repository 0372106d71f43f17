//! Infrastructure - configuration, errors and metrics
//!
//! This module contains infrastructure concerns:
//! - `config` - Application configuration (TOML loading, defaults, validation)
//! - `error` - Library error type
//! - `metrics` - Lock-free metrics collection

pub mod config;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use config::{Config, ConfigArgs};
pub use error::SimError;
pub use metrics::Metrics;

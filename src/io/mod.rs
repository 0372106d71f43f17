//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `paths` - Polyline feature set loading (JSON)
//! - `http` - Feature query HTTP endpoint
//! - `prometheus` - Prometheus metrics text format
//! - `egress` - Page output to file (JSONL format)

pub mod egress;
pub mod http;
pub mod paths;
pub mod prometheus;

// Re-export commonly used types
pub use egress::PageEgress;
pub use http::{start_query_server, SharedService};
pub use paths::load_feature_set;

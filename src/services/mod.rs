//! Services - simulation logic and state management
//!
//! This module contains the core simulation services:
//! - `id_generator` - Cyclical non-zero object ids
//! - `path_indexer` - Initial state for each tracked asset
//! - `position_updater` - One-step advancement along paths
//! - `mock_service` - Page cursor and feature emission

pub mod id_generator;
pub mod mock_service;
pub mod path_indexer;
pub mod position_updater;

// Re-export commonly used types
pub use id_generator::IdGenerator;
pub use mock_service::MockService;
pub use path_indexer::{build_state, IndexedAssets};
pub use position_updater::{advance_all, UpdateStats};

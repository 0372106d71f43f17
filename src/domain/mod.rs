//! Domain models - path geometry, kinematic state and emitted features
//!
//! This module contains the canonical data types used throughout the system:
//! - `FeatureSet` - polyline features consumed once at initialization
//! - `Path` / `Vertex` - the immutable geometry each asset travels along
//! - `KinematicState` - per-asset progress along its current segment
//! - `Observation` - the point feature reported for each asset
//! - `FeatureResult` - the page envelope returned to callers

pub mod geometry;
pub mod types;

// Re-export commonly used types at module level
pub use geometry::{azimuth, interpolate, segment_length};
pub use types::{
    Attributes, FeatureResult, FeatureSet, KinematicState, Observation, Path, Point,
    PolylineFeature, Vertex,
};

//! Shared types for the mock feature service

use serde::{Deserialize, Serialize};

/// Polyline feature set as published by a map/feature server
///
/// Only `features[i].geometry.paths[0]` is used; attributes are carried
/// through deserialization but never read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureSet {
    #[serde(default)]
    pub features: Vec<PolylineFeature>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolylineFeature {
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<Polyline>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Polyline {
    /// Coordinate sequences; each coordinate is `[x, y, ...]`
    #[serde(default)]
    pub paths: Vec<Vec<Vec<f64>>>,
}

impl FeatureSet {
    /// Build a feature set from plain `(x, y)` paths, one feature per path
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = (f64, f64)>,
    {
        let features = paths
            .into_iter()
            .map(|path| PolylineFeature {
                attributes: serde_json::Map::new(),
                geometry: Some(Polyline {
                    paths: vec![path.into_iter().map(|(x, y)| vec![x, y]).collect()],
                }),
            })
            .collect();
        Self { features }
    }

    /// Total number of vertices across every path of every feature
    pub fn vertex_count(&self) -> usize {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .flat_map(|g| g.paths.iter())
            .map(Vec::len)
            .sum()
    }

    /// First path of each feature, indexed by input position
    pub fn first_paths(&self) -> Vec<Path> {
        self.features.iter().map(PolylineFeature::first_path).collect()
    }
}

impl PolylineFeature {
    /// First coordinate sequence as a `Path`; empty when absent or malformed
    pub fn first_path(&self) -> Path {
        self.geometry
            .as_ref()
            .and_then(|g| g.paths.first())
            .map(|coords| Path::from_coords(coords))
            .unwrap_or_default()
    }
}

/// 2D vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

/// Ordered vertex sequence an asset travels along; immutable after load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    vertices: Vec<Vertex>,
}

impl Path {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Convert raw coordinates, keeping `x`/`y` and dropping z/m.
    /// Any coordinate with fewer than two values yields an empty path.
    pub fn from_coords(coords: &[Vec<f64>]) -> Self {
        let vertices: Option<Vec<Vertex>> = coords
            .iter()
            .map(|c| match c.as_slice() {
                [x, y, ..] => Some(Vertex { x: *x, y: *y }),
                _ => None,
            })
            .collect();
        Self { vertices: vertices.unwrap_or_default() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Segment starting at `index`, if both endpoints exist
    #[inline]
    pub fn segment(&self, index: usize) -> Option<(Vertex, Vertex)> {
        match (self.vertices.get(index), self.vertices.get(index + 1)) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        }
    }
}

/// Per-asset progress along its path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    /// Index of the owning feature in the input set
    pub feature_index: usize,
    /// Start vertex of the current segment
    pub vertex_index: usize,
    pub segment_length: f64,
    pub accumulated_distance: f64,
    /// Distance advanced per update step
    pub speed: f64,
}

/// Point feature attributes, serialized with the feature-service field names
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(rename = "OBJECTID")]
    pub object_id: u32,
    #[serde(rename = "TRACKID")]
    pub track_id: f64,
    #[serde(rename = "HEADING")]
    pub heading: f64,
    #[serde(rename = "TYPE")]
    pub asset_type: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<Vertex> for Point {
    #[inline]
    fn from(v: Vertex) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Last reported position and attributes of one asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub attributes: Attributes,
    pub geometry: Point,
}

pub const FEATURE_RESULT_TYPE: &str = "featureResult";

/// Page envelope: `{ "type": "featureResult", "features": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureResult {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Observation>,
}

impl FeatureResult {
    pub fn new(features: Vec<Observation>) -> Self {
        Self { kind: FEATURE_RESULT_TYPE, features }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

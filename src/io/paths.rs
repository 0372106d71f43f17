//! Polyline input loading
//!
//! The input is a JSON feature set with polyline geometry
//! (`{ "features": [ { "geometry": { "paths": [...] } } ] }`).

use crate::domain::types::FeatureSet;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

/// Read and parse a polyline feature set from `path`
pub fn load_feature_set<P: AsRef<Path>>(path: P) -> anyhow::Result<FeatureSet> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read paths file {}", path.display()))?;

    let features = parse_feature_set(&content)
        .with_context(|| format!("Failed to parse paths file {}", path.display()))?;

    info!(
        file = %path.display(),
        features = %features.features.len(),
        vertices = %features.vertex_count(),
        "paths_loaded"
    );
    Ok(features)
}

pub fn parse_feature_set(json: &str) -> serde_json::Result<FeatureSet> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_feature_set() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"features":[{"geometry":{"paths":[[[0,0],[1,1],[2,0]]]}}]}"#)
            .unwrap();
        file.flush().unwrap();

        let set = load_feature_set(file.path()).unwrap();
        assert_eq!(set.features.len(), 1);
        assert_eq!(set.vertex_count(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_feature_set("/nonexistent/paths.json").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read paths file"));
    }

    #[test]
    fn test_parse_rejects_non_numeric_coordinates() {
        assert!(parse_feature_set(r#"{"features":[{"geometry":{"paths":[[["a",0]]]}}]}"#).is_err());
    }
}

//! Page egress - writes served pages to file
//!
//! Pages are written in JSONL format (one feature result per line)
//! to the file specified in config.

use crate::domain::types::FeatureResult;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

/// Egress writer for feature result pages
pub struct PageEgress {
    file_path: String,
}

impl PageEgress {
    pub fn new(file_path: &str) -> Self {
        info!(file_path = %file_path, "egress_initialized");
        Self { file_path: file_path.to_string() }
    }

    /// Write a page to the egress file
    /// Returns true if successful, false otherwise
    pub fn write_page(&self, page: &FeatureResult) -> bool {
        let json = match page.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "page_serialize_failed");
                return false;
            }
        };

        match self.append_line(&json) {
            Ok(()) => true,
            Err(e) => {
                error!(file = %self.file_path, error = %e, "page_egress_failed");
                false
            }
        }
    }

    /// Append a line to the egress file
    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", line)?;
        debug!(file = %self.file_path, bytes = %line.len(), "egress_written");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Attributes, Observation, Point};
    use std::fs;
    use tempfile::tempdir;

    fn page(object_id: u32) -> FeatureResult {
        FeatureResult::new(vec![Observation {
            attributes: Attributes { object_id, track_id: 0.5, heading: 0.0, asset_type: 1 },
            geometry: Point { x: 1.0, y: 2.0 },
        }])
    }

    #[test]
    fn test_write_pages() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("out").join("pages.jsonl");
        let egress = PageEgress::new(file_path.to_str().unwrap());

        assert!(egress.write_page(&page(1)));
        assert!(egress.write_page(&page(2)));

        let content = fs::read_to_string(&file_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "featureResult");
        assert_eq!(second["features"][0]["attributes"]["OBJECTID"], 2);
    }
}

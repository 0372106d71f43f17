//! Builds the initial kinematic state and observation for every tracked asset

use crate::domain::geometry::{azimuth, segment_length};
use crate::domain::types::{Attributes, KinematicState, Observation, Path};
use crate::services::id_generator::IdGenerator;
use rand::Rng;
use tracing::debug;

/// Asset types are drawn uniformly from `0..=MAX_ASSET_TYPE`
pub const MAX_ASSET_TYPE: u8 = 5;

/// Parallel state/observation arrays, one entry per tracked asset
#[derive(Debug, Clone, Default)]
pub struct IndexedAssets {
    pub states: Vec<KinematicState>,
    pub observations: Vec<Observation>,
}

impl IndexedAssets {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Index up to `cap` assets from `paths`, in input order.
///
/// Paths with fewer than two vertices are skipped and do not count against
/// `cap`. `TRACKID` is `input_index / 4`, so skipped paths leave gaps.
pub fn build_state<R: Rng + ?Sized>(
    paths: &[Path],
    cap: usize,
    dist_step: f64,
    ids: &mut IdGenerator,
    rng: &mut R,
) -> IndexedAssets {
    let capacity = cap.min(paths.len());
    let mut assets = IndexedAssets {
        states: Vec::with_capacity(capacity),
        observations: Vec::with_capacity(capacity),
    };
    let mut skipped = 0usize;

    for (feature_index, path) in paths.iter().enumerate() {
        if assets.len() >= cap {
            break;
        }

        let Some((v0, v1)) = path.segment(0) else {
            skipped += 1;
            continue;
        };

        let dist = segment_length(v0, v1);
        assets.states.push(KinematicState {
            feature_index,
            vertex_index: 0,
            segment_length: dist,
            accumulated_distance: 0.0,
            speed: dist / dist_step,
        });
        assets.observations.push(Observation {
            attributes: Attributes {
                object_id: ids.next_id(),
                track_id: feature_index as f64 / 4.0,
                heading: azimuth(v1.x - v0.x, v1.y - v0.y),
                asset_type: rng.gen_range(0..=MAX_ASSET_TYPE),
            },
            geometry: v0.into(),
        });
    }

    debug!(tracked = %assets.len(), skipped = %skipped, cap = %cap, "paths_indexed");
    assets
}

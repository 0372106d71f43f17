//! Advances every tracked asset one step along its path

use crate::domain::geometry::{azimuth, interpolate, segment_length};
use crate::domain::types::{KinematicState, Observation, Path};
use crate::services::id_generator::IdGenerator;

/// Outcome of one update pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub advanced: usize,
    pub segment_changes: usize,
    pub wraparounds: usize,
}

/// Move each asset by `speed` along its current segment and refresh its
/// observation with a new object id, heading and position.
///
/// The reported position is not clamped to the segment. When the following
/// step would reach the segment end, the asset moves to the next segment
/// (looping back to vertex 0 after the last one) and its length and speed are
/// recomputed from the path's first segment.
pub fn advance_all(
    paths: &[Path],
    dist_step: f64,
    states: &mut [KinematicState],
    observations: &mut [Observation],
    ids: &mut IdGenerator,
) -> UpdateStats {
    let mut stats = UpdateStats::default();

    for (state, obs) in states.iter_mut().zip(observations.iter_mut()) {
        let Some(path) = paths.get(state.feature_index) else {
            continue;
        };
        let Some((v0, v1)) = path.segment(state.vertex_index) else {
            continue;
        };

        let next_dist = state.accumulated_distance + state.speed;
        let ratio =
            if state.segment_length > 0.0 { next_dist / state.segment_length } else { 0.0 };

        obs.attributes.object_id = ids.next_id();
        obs.attributes.heading = azimuth(v1.x - v0.x, v1.y - v0.y);
        obs.geometry = interpolate(v0, v1, ratio).into();

        state.accumulated_distance = next_dist;
        stats.advanced += 1;

        if next_dist + state.speed >= state.segment_length {
            state.vertex_index += 1;
            if state.vertex_index >= path.len() - 1 {
                state.vertex_index = 0;
                stats.wraparounds += 1;
            }

            // Length and speed always come from the first segment
            if let Some((a, b)) = path.segment(0) {
                let dist = segment_length(a, b);
                state.segment_length = dist;
                state.speed = dist / dist_step;
            }
            state.accumulated_distance = 0.0;
            stats.segment_changes += 1;
        }
    }

    stats
}

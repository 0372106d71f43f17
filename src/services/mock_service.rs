//! Paged mock feature service
//!
//! Owns the simulated population and serves it one page per call. The full
//! population is advanced once per page cycle, when the cursor wraps to
//! page 0; other pages return the positions computed at that update.

use crate::domain::types::{FeatureResult, FeatureSet, KinematicState, Observation, Path};
use crate::infra::config::Config;
use crate::infra::error::Result;
use crate::infra::metrics::Metrics;
use crate::services::id_generator::IdGenerator;
use crate::services::path_indexer::{build_state, IndexedAssets};
use crate::services::position_updater::advance_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct MockService<R = StdRng> {
    tracked_cap: usize,
    page_size: usize,
    dist_step: f64,
    ids: IdGenerator,
    rng: R,
    page: usize,
    cycles: u64,
    paths: Vec<Path>,
    assets: IndexedAssets,
    metrics: Option<Arc<Metrics>>,
}

impl MockService<StdRng> {
    /// Create a service, seeding asset types from `config.seed()` when set
    pub fn new(config: &Config) -> Result<Self> {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> MockService<R> {
    /// Create a service drawing asset types from `rng`
    pub fn with_rng(config: &Config, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tracked_cap: config.tracked_assets(),
            page_size: config.page_size(),
            dist_step: config.dist_step(),
            ids: IdGenerator::new(),
            rng,
            page: 0,
            cycles: 0,
            paths: Vec::new(),
            assets: IndexedAssets::default(),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Load the path geometry and build the initial population.
    ///
    /// Replaces any previous population and resets the page cursor;
    /// object ids keep counting from where they were.
    pub fn initialize(&mut self, features: &FeatureSet) {
        self.paths = features.first_paths();
        self.assets =
            build_state(&self.paths, self.tracked_cap, self.dist_step, &mut self.ids, &mut self.rng);
        self.page = 0;
        self.cycles = 0;

        if let Some(metrics) = &self.metrics {
            metrics.set_tracked_assets(self.assets.len());
        }

        info!(
            features = %features.features.len(),
            vertices = %features.vertex_count(),
            tracked_assets = %self.assets.len(),
            page_size = %self.page_size,
            max_page = %self.max_page(),
            "service_initialized"
        );
    }

    /// Serve the next page, advancing every asset first when the cursor
    /// wraps to page 0
    pub fn next_page(&mut self) -> FeatureResult {
        let page = self.advance_cursor();
        if page == 0 {
            self.update_positions();
        }

        let tracked = self.assets.len();
        let start = (page * self.page_size).min(tracked);
        let end = (start + self.page_size).min(tracked);
        let features = self.assets.observations[start..end].to_vec();

        if let Some(metrics) = &self.metrics {
            metrics.record_page(features.len());
        }
        debug!(page = %page, start = %start, end = %end, "page_served");

        FeatureResult::new(features)
    }

    /// Serve the next page as a JSON string
    pub fn next(&mut self) -> Result<String> {
        Ok(self.next_page().to_json()?)
    }

    fn advance_cursor(&mut self) -> usize {
        self.page += 1;
        if self.page >= self.max_page() {
            self.page = 0;
        }
        self.page
    }

    fn update_positions(&mut self) {
        let start = Instant::now();
        let stats = advance_all(
            &self.paths,
            self.dist_step,
            &mut self.assets.states,
            &mut self.assets.observations,
            &mut self.ids,
        );
        self.cycles += 1;
        let latency_us = start.elapsed().as_micros() as u64;

        if let Some(metrics) = &self.metrics {
            metrics.record_update(stats.advanced, latency_us);
        }
        debug!(
            cycle = %self.cycles,
            advanced = %stats.advanced,
            segment_changes = %stats.segment_changes,
            wraparounds = %stats.wraparounds,
            latency_us = %latency_us,
            "positions_updated"
        );
    }

    /// Number of assets in the simulated population
    pub fn tracked_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Pages per full cycle
    pub fn max_page(&self) -> usize {
        self.assets.len().div_ceil(self.page_size)
    }

    /// Index of the page served by the last call
    pub fn page(&self) -> usize {
        self.page
    }

    /// Full position updates run since initialization
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn states(&self) -> &[KinematicState] {
        &self.assets.states
    }

    pub fn observations(&self) -> &[Observation] {
        &self.assets.observations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::error::SimError;

    fn config(cap: usize, page_size: usize, dist_step: f64) -> Config {
        Config::default().with_simulation(cap, page_size, dist_step).with_seed(42)
    }

    fn unit_paths(n: usize) -> FeatureSet {
        FeatureSet::from_paths((0..n).map(|i| vec![(i as f64, 0.0), (i as f64, 10.0)]))
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let result = MockService::new(&config(10, 0, 0.1));
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_single_asset_scenario() {
        let mut service = MockService::new(&config(1, 1, 1.0)).unwrap();
        service.initialize(&FeatureSet::from_paths(vec![vec![(0.0, 0.0), (10.0, 0.0)]]));
        assert_eq!(service.states()[0].segment_length, 10.0);
        assert_eq!(service.states()[0].speed, 10.0);

        let result = service.next_page();
        assert_eq!(result.features.len(), 1);
        assert_eq!(result.features[0].geometry.x, 10.0);
        assert_eq!(result.features[0].geometry.y, 0.0);
        assert_eq!(service.cycles(), 1);

        // Wrapped: state reset from segment 0 -> 1
        let state = service.states()[0];
        assert_eq!(state.vertex_index, 0);
        assert_eq!(state.accumulated_distance, 0.0);
        assert_eq!(state.segment_length, 10.0);
        assert_eq!(state.speed, 10.0);

        // Every call is page 0 and updates again
        service.next_page();
        assert_eq!(service.cycles(), 2);
    }

    #[test]
    fn test_first_call_serves_page_one() {
        let mut service = MockService::new(&config(10, 4, 0.1)).unwrap();
        service.initialize(&unit_paths(10));
        assert_eq!(service.max_page(), 3);

        let first = service.next_page();
        assert_eq!(service.page(), 1);
        assert_eq!(service.cycles(), 0);
        assert_eq!(first.features.len(), 4);
        assert_eq!(first.features[0].attributes.track_id, 1.0);

        let second = service.next_page();
        assert_eq!(service.page(), 2);
        // Short final page is not padded
        assert_eq!(second.features.len(), 2);

        let third = service.next_page();
        assert_eq!(service.page(), 0);
        assert_eq!(service.cycles(), 1);
        assert_eq!(third.features.len(), 4);
    }

    #[test]
    fn test_update_once_per_cycle() {
        let mut service = MockService::new(&config(7, 2, 0.1)).unwrap();
        service.initialize(&unit_paths(7));
        let max_page = service.max_page();
        assert_eq!(max_page, 4);

        for _ in 0..(max_page * 5) {
            service.next_page();
        }
        assert_eq!(service.cycles(), 5);
    }

    #[test]
    fn test_ids_refresh_each_cycle() {
        let mut service = MockService::new(&config(3, 3, 0.1)).unwrap();
        service.initialize(&unit_paths(3));
        let initial: Vec<u32> =
            service.observations().iter().map(|o| o.attributes.object_id).collect();
        assert_eq!(initial, vec![1, 2, 3]);

        let page = service.next_page();
        let updated: Vec<u32> = page.features.iter().map(|o| o.attributes.object_id).collect();
        assert_eq!(updated, vec![4, 5, 6]);
    }

    #[test]
    fn test_empty_population() {
        let mut service = MockService::new(&config(10, 4, 0.1)).unwrap();
        service.initialize(&FeatureSet::default());
        assert_eq!(service.tracked_assets(), 0);
        assert_eq!(service.max_page(), 0);
        assert!(service.next_page().features.is_empty());
        assert!(service.next_page().features.is_empty());
    }

    #[test]
    fn test_cap_larger_than_input_uses_tracked_count() {
        let mut service = MockService::new(&config(50_000, 10_000, 0.1)).unwrap();
        service.initialize(&unit_paths(3));
        assert_eq!(service.tracked_assets(), 3);
        assert_eq!(service.max_page(), 1);

        let page = service.next_page();
        assert_eq!(page.features.len(), 3);
        assert_eq!(service.cycles(), 1);
    }

    #[test]
    fn test_next_returns_envelope_json() {
        let mut service = MockService::new(&config(2, 2, 0.1)).unwrap();
        service.initialize(&unit_paths(2));

        let json = service.next().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "featureResult");
        assert_eq!(value["features"].as_array().unwrap().len(), 2);
        assert!(value["features"][0]["attributes"]["OBJECTID"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_metrics_recorded() {
        let metrics = Arc::new(Metrics::new());
        let mut service =
            MockService::new(&config(4, 2, 0.1)).unwrap().with_metrics(metrics.clone());
        service.initialize(&unit_paths(4));

        service.next_page();
        service.next_page();
        assert_eq!(metrics.pages_total(), 2);
        assert_eq!(metrics.update_cycles_total(), 1);
    }
}

use formats::{Dataset, Feature, FileMeta, IngestError, IngestWarning, UploadedFile, ingest};
use layers::{Layer, PointCloudLayer, VectorLayer, ViewKind};
use runtime::ActivityLog;
use scene::{ActiveFeature, AltitudeRange, FeatureFilter, PlaybackState, Timeline};

use crate::config::DashboardConfig;

const POINT_LAYER_ID: u64 = 1;
const FEATURE_LAYER_ID: u64 = 2;

/// Single owner of the dashboard state.
///
/// Every mutation goes through a method here, and every method that touches
/// an input re-derives the views that depend on it before returning, so no
/// derived state is ever stale.
#[derive(Debug)]
pub struct Store {
    config: DashboardConfig,
    log: ActivityLog,
    file: Option<FileMeta>,
    warnings: Vec<IngestWarning>,
    active_view: ViewKind,
    points: PointCloudLayer,
    features: VectorLayer,
    filter: FeatureFilter,
    timeline: Timeline,
    active_feature: ActiveFeature,
}

impl Store {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            log: ActivityLog::with_startup_entry(),
            file: None,
            warnings: Vec::new(),
            active_view: ViewKind::Map,
            points: PointCloudLayer::new(POINT_LAYER_ID, config.point_size_settings()),
            features: VectorLayer::new(FEATURE_LAYER_ID),
            filter: FeatureFilter::new(),
            timeline: Timeline::new(config.tick_period_s),
            active_feature: ActiveFeature::default(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Replaces the loaded dataset with `file`.
    ///
    /// The previous dataset is dropped first, so a failed upload leaves the
    /// store empty. On success the matching view becomes active and the
    /// upload is recorded in the activity log.
    pub fn ingest(&mut self, file: &UploadedFile<'_>) -> Result<&FileMeta, IngestError> {
        self.clear_dataset();

        let ingested = ingest(file, &self.config.ingest_limits()).inspect_err(|err| {
            tracing::warn!(file = file.name, kind = err.kind(), "upload rejected: {err}");
        })?;

        self.log.append("upload", ingested.event);
        self.warnings = ingested.warnings;
        match ingested.data {
            Dataset::Features(collection) => {
                self.timeline.reset_for(&collection);
                self.features.load(collection);
                self.active_view = ViewKind::Map;
                self.refresh_features();
            }
            Dataset::Points(points) => {
                self.points.load(points);
                self.active_view = ViewKind::Points;
            }
        }
        Ok(self.file.insert(ingested.meta))
    }

    /// Drops the dataset, file details and every view derived from them.
    pub fn clear_dataset(&mut self) {
        self.file = None;
        self.warnings.clear();
        for layer in [
            &mut self.points as &mut dyn Layer,
            &mut self.features as &mut dyn Layer,
        ] {
            layer.clear();
        }
        self.filter = FeatureFilter::new();
        self.timeline.replace_steps(Default::default());
        self.active_feature.clear();
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn file_meta(&self) -> Option<&FileMeta> {
        self.file.as_ref()
    }

    pub fn warnings(&self) -> &[IngestWarning] {
        &self.warnings
    }

    pub fn active_view(&self) -> ViewKind {
        self.active_view
    }

    pub fn set_active_view(&mut self, view: ViewKind) {
        self.active_view = view;
    }

    /// The layer feeding the active view, if it holds data.
    pub fn active_layer(&self) -> Option<&dyn Layer> {
        let layer: &dyn Layer = match self.active_view {
            ViewKind::Map => &self.features,
            ViewKind::Points => &self.points,
        };
        layer.is_loaded().then_some(layer)
    }

    // Point view

    pub fn points(&self) -> &PointCloudLayer {
        &self.points
    }

    pub fn set_altitude_range(&mut self, min: f64, max: f64) {
        self.points.set_altitude_range(AltitudeRange::new(min, max));
    }

    pub fn set_point_size(&mut self, size: f64) -> f64 {
        self.points.set_point_size(size)
    }

    // Map view

    pub fn features(&self) -> &VectorLayer {
        &self.features
    }

    pub fn filter(&self) -> &FeatureFilter {
        &self.filter
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        let selected = self.filter.toggle_tag(tag);
        self.refresh_features();
        selected
    }

    pub fn set_selected_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter.set_tags(tags);
        self.refresh_features();
    }

    pub fn play(&mut self) -> bool {
        self.timeline.play()
    }

    pub fn pause(&mut self) -> bool {
        self.timeline.pause()
    }

    pub fn toggle_playback(&mut self) -> PlaybackState {
        self.timeline.toggle()
    }

    pub fn restart_playback(&mut self) {
        self.timeline.restart();
        self.refresh_features();
    }

    /// Feeds elapsed wall time to the animation. Returns `true` if the time
    /// cursor moved (and the map view was re-derived).
    pub fn tick(&mut self, dt_s: f64) -> bool {
        if !self.timeline.advance(dt_s) {
            return false;
        }
        self.refresh_features();
        true
    }

    /// Opens `index` if it is currently shown on the map.
    pub fn select_feature(&mut self, index: usize) -> bool {
        if !self.features.snapshot().filtered.contains(index) {
            return false;
        }
        self.active_feature.select(index);
        true
    }

    pub fn clear_active_feature(&mut self) {
        self.active_feature.clear();
    }

    pub fn active_feature(&self) -> Option<(usize, &Feature)> {
        let index = self.active_feature.get()?;
        Some((index, self.features.feature(index)?))
    }

    fn refresh_features(&mut self) {
        self.filter.set_cursor(self.timeline.cursor().cloned());
        self.features.refresh(&self.filter);
        if self
            .active_feature
            .retain_visible(&self.features.snapshot().filtered)
        {
            tracing::debug!("active feature filtered out");
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

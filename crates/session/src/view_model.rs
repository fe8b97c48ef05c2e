//! Serialisable snapshots of the store for presentation adapters.

use foundation::{BoundingSphere, format_fixed2};
use formats::{FileMeta, GeoPoint};
use layers::{CameraFraming, PointSizeControl, ViewKind};
use runtime::ActivityEntry;
use scene::{AltitudeRange, PlaybackState};
use serde::Serialize;
use serde_json::Value;

use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub active_view: ViewKind,
    pub file: Option<FileDetailsView>,
    pub warnings: Vec<String>,
    pub log: Vec<ActivityEntry>,
    pub points: Option<PointCloudViewModel>,
    pub map: Option<MapViewModel>,
}

/// File-details panel, numbers pre-formatted to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetailsView {
    #[serde(flatten)]
    pub meta: FileMeta,
    pub dimensions_label: Option<[String; 3]>,
    pub center_label: Option<[String; 3]>,
}

impl From<&FileMeta> for FileDetailsView {
    fn from(meta: &FileMeta) -> Self {
        let dimensions_label = meta.bounds.map(|b| {
            let d = b.dimensions;
            [d.width, d.length, d.height].map(format_fixed2)
        });
        let center_label = meta.bounds.map(|b| {
            let c = b.center;
            [c.x, c.y, c.z].map(format_fixed2)
        });
        Self {
            meta: meta.clone(),
            dimensions_label,
            center_label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointCloudViewModel {
    pub total_points: usize,
    pub visible_points: usize,
    /// Interleaved `x, y, z` of the visible points.
    pub positions: Vec<f32>,
    /// Interleaved `r, g, b`, one triple per visible point.
    pub colors: Vec<f32>,
    pub sphere: Option<BoundingSphere>,
    pub altitude: AltitudeRange,
    pub z_bounds: Option<(f64, f64)>,
    pub point_size: PointSizeControl,
    pub camera: CameraFraming,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineViewModel {
    pub steps: Vec<String>,
    pub index: usize,
    pub current: Option<String>,
    pub progress: Option<(usize, usize)>,
    pub state: PlaybackState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapViewModel {
    pub total_features: usize,
    pub filtered_features: usize,
    /// GeoJSON FeatureCollection of everything not on the track.
    pub static_features: Value,
    pub track_path: Vec<GeoPoint>,
    /// GeoJSON Feature at the head of the track.
    pub track_current: Option<Value>,
    pub available_tags: Vec<String>,
    pub selected_tags: Vec<String>,
    pub timeline: TimelineViewModel,
    pub active_feature: Option<ActiveFeatureView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFeatureView {
    pub index: usize,
    pub feature: Value,
}

impl DashboardView {
    pub fn from_store(store: &Store) -> Self {
        Self {
            active_view: store.active_view(),
            file: store.file_meta().map(FileDetailsView::from),
            warnings: store.warnings().iter().map(ToString::to_string).collect(),
            log: store.log().entries().to_vec(),
            points: PointCloudViewModel::from_store(store),
            map: MapViewModel::from_store(store),
        }
    }
}

impl PointCloudViewModel {
    pub fn from_store(store: &Store) -> Option<Self> {
        let layer = store.points();
        let source = layer.source()?;
        let view = layer.view();
        Some(Self {
            total_points: source.len(),
            visible_points: view.visible.len(),
            positions: view.flat_positions(),
            colors: view.flat_colors(),
            sphere: view.sphere,
            altitude: layer.altitude_range(),
            z_bounds: layer.z_bounds(),
            point_size: *layer.point_size(),
            camera: *layer.framing(),
        })
    }
}

impl TimelineViewModel {
    pub fn from_store(store: &Store) -> Self {
        let timeline = store.timeline();
        Self {
            steps: timeline
                .steps()
                .as_slice()
                .iter()
                .map(|s| s.raw.clone())
                .collect(),
            index: timeline.index(),
            current: timeline.cursor().map(|c| c.raw.clone()),
            progress: timeline.progress(),
            state: timeline.state(),
        }
    }
}

impl MapViewModel {
    pub fn from_store(store: &Store) -> Option<Self> {
        let layer = store.features();
        let source = layer.source()?;
        let snapshot = layer.snapshot();
        Some(Self {
            total_features: source.len(),
            filtered_features: snapshot.filtered.len(),
            static_features: layer.static_geojson(),
            track_path: snapshot.track.path.clone(),
            track_current: snapshot
                .track
                .current()
                .and_then(|i| layer.feature(i))
                .map(|f| f.to_geojson_value()),
            available_tags: layer.vocabulary().as_slice().to_vec(),
            selected_tags: store.filter().selected_tags().iter().cloned().collect(),
            timeline: TimelineViewModel::from_store(store),
            active_feature: store
                .active_feature()
                .map(|(index, feature)| ActiveFeatureView {
                    index,
                    feature: feature.to_geojson_value(),
                }),
        })
    }
}

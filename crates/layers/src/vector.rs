use foundation::{Time, chronological_cmp};
use formats::{Feature, FeatureCollection, GeoPoint, Shape};
use scene::{FeatureFilter, FeatureSet, TagVocabulary};
use serde_json::Value;

use crate::layer::{Layer, LayerId, ViewKind};

/// Indices of the features that pass `filter`, in source order.
pub fn apply_feature_filter(collection: &FeatureCollection, filter: &FeatureFilter) -> FeatureSet {
    let mut out = FeatureSet::with_capacity(collection.len());
    for (i, feature) in collection.features.iter().enumerate() {
        if filter.passes(feature) {
            out.insert(i);
        }
    }
    out
}

/// Timestamped point features ordered by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    /// Feature indices, oldest first.
    pub members: Vec<usize>,
    /// Coordinates of `members`, same order.
    pub path: Vec<GeoPoint>,
}

impl Track {
    /// The most recent member: the current-position marker.
    pub fn current(&self) -> Option<usize> {
        self.members.last().copied()
    }

    pub fn current_position(&self) -> Option<GeoPoint> {
        self.path.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_set(&self) -> FeatureSet {
        self.members.iter().copied().collect()
    }
}

/// Builds the track from the features in `visible`.
///
/// A member must be a `Point` with readable coordinates and a parsable
/// timestamp; everything else stays with the static features.
pub fn extract_track(collection: &FeatureCollection, visible: &FeatureSet) -> Track {
    let mut candidates: Vec<(usize, Time, GeoPoint)> = visible
        .iter()
        .filter_map(|i| {
            let feature = collection.features.get(i)?;
            let (time, position) = track_point(feature)?;
            Some((i, time, position))
        })
        .collect();
    candidates.sort_by(|a, b| chronological_cmp(Some(a.1), Some(b.1)));

    Track {
        members: candidates.iter().map(|c| c.0).collect(),
        path: candidates.iter().map(|c| c.2).collect(),
    }
}

fn track_point(feature: &Feature) -> Option<(Time, GeoPoint)> {
    let geometry = feature.geometry.as_ref().filter(|g| g.is_point())?;
    let time = feature.timestamp()?.time?;
    match geometry.shape() {
        Ok(Shape::Point(p)) => Some((time, p)),
        _ => None,
    }
}

/// Everything the map needs for one filter state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorLayerSnapshot {
    /// Features passing the tag and time filter.
    pub filtered: FeatureSet,
    pub track: Track,
    /// `filtered` minus the track members, rendered one by one.
    pub static_features: FeatureSet,
}

/// The 2D map view: source collection, tag vocabulary and filtered state.
#[derive(Debug, Clone)]
pub struct VectorLayer {
    id: LayerId,
    source: Option<FeatureCollection>,
    vocabulary: TagVocabulary,
    snapshot: VectorLayerSnapshot,
}

impl VectorLayer {
    pub fn new(id: u64) -> Self {
        Self {
            id: LayerId(id),
            source: None,
            vocabulary: TagVocabulary::default(),
            snapshot: VectorLayerSnapshot::default(),
        }
    }

    /// Installs a new collection and derives its tag vocabulary.
    ///
    /// Call [`VectorLayer::refresh`] afterwards with the current filter.
    pub fn load(&mut self, collection: FeatureCollection) {
        self.vocabulary = TagVocabulary::derive(&collection);
        tracing::info!(
            features = collection.len(),
            tags = self.vocabulary.len(),
            "feature collection loaded"
        );
        self.source = Some(collection);
        self.snapshot = VectorLayerSnapshot::default();
    }

    /// Re-derives the filtered view, the track and the static set.
    pub fn refresh(&mut self, filter: &FeatureFilter) {
        let Some(collection) = &self.source else {
            self.snapshot = VectorLayerSnapshot::default();
            return;
        };
        let filtered = apply_feature_filter(collection, filter);
        let track = extract_track(collection, &filtered);
        let static_features = filtered.diff(&track.member_set());
        self.snapshot = VectorLayerSnapshot {
            filtered,
            track,
            static_features,
        };
    }

    pub fn source(&self) -> Option<&FeatureCollection> {
        self.source.as_ref()
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    pub fn snapshot(&self) -> &VectorLayerSnapshot {
        &self.snapshot
    }

    pub fn feature(&self, index: usize) -> Option<&Feature> {
        self.source.as_ref()?.features.get(index)
    }

    /// The features of `set` as a standalone collection.
    pub fn collect(&self, set: &FeatureSet) -> FeatureCollection {
        let Some(source) = &self.source else {
            return FeatureCollection::default();
        };
        FeatureCollection::new(
            set.iter()
                .filter_map(|i| source.features.get(i).cloned())
                .collect(),
        )
    }

    pub fn filtered_geojson(&self) -> Value {
        self.collect(&self.snapshot.filtered).to_geojson_value()
    }

    pub fn static_geojson(&self) -> Value {
        self.collect(&self.snapshot.static_features)
            .to_geojson_value()
    }
}

impl Layer for VectorLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Map
    }

    fn is_loaded(&self) -> bool {
        self.source.is_some()
    }

    fn clear(&mut self) {
        self.source = None;
        self.vocabulary = TagVocabulary::default();
        self.snapshot = VectorLayerSnapshot::default();
    }
}

use std::collections::BTreeSet;

use foundation::{Time, Timestamp};
use formats::Feature;
use serde::Serialize;

/// Inclusive `[min, max]` altitude window for the point view.
///
/// A reversed window (`min > max`) is accepted and matches nothing.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct AltitudeRange {
    pub min: f64,
    pub max: f64,
}

impl AltitudeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, z: f64) -> bool {
        self.min <= z && z <= self.max
    }

    pub fn is_reversed(&self) -> bool {
        self.min > self.max
    }
}

/// Tag and time filter for the map view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFilter {
    selected_tags: BTreeSet<String>,
    cursor: Option<Timestamp>,
}

impl FeatureFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected_tags
    }

    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_tags = tags.into_iter().map(Into::into).collect();
    }

    /// Checkbox semantics. Returns `true` if the tag is now selected.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.selected_tags.remove(tag) {
            false
        } else {
            self.selected_tags.insert(tag.to_string());
            true
        }
    }

    pub fn clear_tags(&mut self) {
        self.selected_tags.clear();
    }

    pub fn cursor(&self) -> Option<&Timestamp> {
        self.cursor.as_ref()
    }

    pub fn set_cursor(&mut self, cursor: Option<Timestamp>) {
        self.cursor = cursor;
    }

    /// Tag test AND time test.
    pub fn passes(&self, feature: &Feature) -> bool {
        self.passes_tags(feature) && self.passes_time(feature)
    }

    /// Every selected tag must be among the feature's tags.
    pub fn passes_tags(&self, feature: &Feature) -> bool {
        self.selected_tags.iter().all(|t| feature.has_tag(t))
    }

    /// Features without a timestamp always pass, as does everything while the
    /// cursor is unset or unparsable. A feature timestamp that cannot be
    /// parsed never compares at or before a set cursor.
    pub fn passes_time(&self, feature: &Feature) -> bool {
        let Some(ts) = feature.timestamp() else {
            return true;
        };
        let Some(cursor) = self.cursor_time() else {
            return true;
        };
        ts.time.is_some_and(|t| t <= cursor)
    }

    fn cursor_time(&self) -> Option<Time> {
        self.cursor.as_ref().and_then(|c| c.time)
    }
}

#[cfg(test)]
mod tests {
    use super::{AltitudeRange, FeatureFilter};
    use foundation::Timestamp;
    use formats::{Feature, Geometry};
    use serde_json::{Map, Value, json};

    fn feature(props: Value) -> Feature {
        let properties: Map<String, Value> = props.as_object().cloned().unwrap_or_default();
        Feature::new(Some(Geometry::point(0.0, 0.0)), properties)
    }

    #[test]
    fn altitude_range_is_inclusive_and_reversed_matches_nothing() {
        let r = AltitudeRange::new(0.0, 10.0);
        assert!(r.contains(0.0));
        assert!(r.contains(10.0));
        assert!(!r.contains(10.5));
        let reversed = AltitudeRange::new(10.0, 0.0);
        assert!(reversed.is_reversed());
        assert!(!reversed.contains(5.0));
        assert!(!AltitudeRange::new(0.0, 1.0).contains(f64::NAN));
    }

    #[test]
    fn tags_must_be_a_superset_of_the_selection() {
        let mut filter = FeatureFilter::new();
        let f = feature(json!({"tags": ["a", "b"]}));
        let untagged = feature(json!({}));
        assert!(filter.passes(&f));
        assert!(filter.passes(&untagged));

        filter.set_tags(["a"]);
        assert!(filter.passes(&f));
        assert!(!filter.passes(&untagged));

        filter.set_tags(["a", "c"]);
        assert!(!filter.passes(&f));
    }

    #[test]
    fn toggle_tag_flips_membership() {
        let mut filter = FeatureFilter::new();
        assert!(filter.toggle_tag("bus"));
        assert!(filter.selected_tags().contains("bus"));
        assert!(!filter.toggle_tag("bus"));
        assert!(filter.selected_tags().is_empty());
    }

    #[test]
    fn time_test_compares_against_cursor() {
        let mut filter = FeatureFilter::new();
        let early = feature(json!({"timestamp": "2023-01-01"}));
        let late = feature(json!({"timestamp": "2023-06-01"}));
        let timeless = feature(json!({}));
        let garbled = feature(json!({"timestamp": "soon"}));

        assert!(filter.passes(&late));
        assert!(filter.passes(&garbled));

        filter.set_cursor(Some(Timestamp::new("2023-03-01")));
        assert!(filter.passes(&early));
        assert!(!filter.passes(&late));
        assert!(filter.passes(&timeless));
        assert!(!filter.passes(&garbled));

        // Equality passes.
        filter.set_cursor(Some(Timestamp::new("2023-06-01")));
        assert!(filter.passes(&late));

        filter.set_cursor(Some(Timestamp::new("not a date")));
        assert!(filter.passes(&late));
    }

    #[test]
    fn tag_and_time_combine_with_and() {
        let mut filter = FeatureFilter::new();
        filter.set_tags(["a"]);
        filter.set_cursor(Some(Timestamp::new("2023-01-01")));
        let f = feature(json!({"tags": ["a"], "timestamp": "2024-01-01"}));
        assert!(!filter.passes(&f));
        filter.set_cursor(None);
        assert!(filter.passes(&f));
    }
}

use std::collections::HashSet;

use foundation::{Timestamp, chronological_cmp};
use formats::FeatureCollection;
use runtime::Ticker;
use serde::Serialize;

/// Distinct feature timestamps in chronological order.
///
/// Deduplication is by the value as written. Unparsable values sort last,
/// ties keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSteps {
    steps: Vec<Timestamp>,
}

impl TimeSteps {
    pub fn derive(collection: &FeatureCollection) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut steps: Vec<Timestamp> = Vec::new();
        for ts in collection.features.iter().filter_map(|f| f.timestamp()) {
            if seen.insert(ts.raw.clone()) {
                steps.push(ts);
            }
        }
        steps.sort_by(|a, b| chronological_cmp(a.time, b.time));
        Self { steps }
    }

    pub fn as_slice(&self) -> &[Timestamp] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Timestamp> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// Cursor over [`TimeSteps`] plus the play/pause animation.
///
/// While playing, every tick of the inner [`Ticker`] advances the cursor by
/// one step, wrapping to the first step after the last.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    steps: TimeSteps,
    index: usize,
    ticker: Ticker,
}

impl Timeline {
    pub fn new(tick_period_s: f64) -> Self {
        Self {
            steps: TimeSteps::default(),
            index: 0,
            ticker: Ticker::new(tick_period_s),
        }
    }

    /// Installs the steps of a new source collection: cursor to 0, playback stopped.
    pub fn reset_for(&mut self, collection: &FeatureCollection) {
        self.replace_steps(TimeSteps::derive(collection));
    }

    pub fn replace_steps(&mut self, steps: TimeSteps) {
        self.ticker.stop();
        self.steps = steps;
        self.index = 0;
        tracing::debug!(steps = self.steps.len(), "timeline reset");
    }

    pub fn steps(&self) -> &TimeSteps {
        &self.steps
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> PlaybackState {
        if self.ticker.is_running() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.ticker.is_running()
    }

    /// The current step, or `None` when there are no steps.
    pub fn cursor(&self) -> Option<&Timestamp> {
        self.steps.get(self.index)
    }

    /// `(index + 1, len)` for a "step i of n" readout.
    pub fn progress(&self) -> Option<(usize, usize)> {
        if self.steps.is_empty() {
            None
        } else {
            Some((self.index + 1, self.steps.len()))
        }
    }

    /// No-op without steps. Returns `true` on a transition.
    pub fn play(&mut self) -> bool {
        if self.steps.is_empty() {
            return false;
        }
        let changed = self.ticker.start();
        if changed {
            tracing::info!(index = self.index, "playback started");
        }
        changed
    }

    /// Returns `true` on a transition.
    pub fn pause(&mut self) -> bool {
        let changed = self.ticker.stop();
        if changed {
            tracing::info!(index = self.index, "playback paused");
        }
        changed
    }

    pub fn toggle(&mut self) -> PlaybackState {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.state()
    }

    /// Back to the first step, stopped.
    pub fn restart(&mut self) {
        self.pause();
        self.index = 0;
    }

    /// Moves the cursor one step, wrapping around. Returns `true` if it moved.
    pub fn step_forward(&mut self) -> bool {
        let len = self.steps.len();
        if len == 0 {
            return false;
        }
        self.index = (self.index + 1) % len;
        true
    }

    /// Feeds elapsed time. Returns `true` if the cursor changed.
    pub fn advance(&mut self, dt_s: f64) -> bool {
        let ticks = self.ticker.advance(dt_s) as usize;
        let len = self.steps.len();
        if ticks == 0 || len == 0 {
            return false;
        }
        let next = (self.index + ticks % len) % len;
        let moved = next != self.index;
        self.index = next;
        moved
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{PlaybackState, TimeSteps, Timeline};
    use formats::FeatureCollection;
    use pretty_assertions::assert_eq;

    fn collection(timestamps: &[&str]) -> FeatureCollection {
        let features: Vec<String> = timestamps
            .iter()
            .map(|t| {
                format!(
                    r#"{{"geometry":{{"type":"Point","coordinates":[0,0]}},"properties":{{"timestamp":"{t}"}}}}"#
                )
            })
            .collect();
        let payload = format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        );
        FeatureCollection::from_geojson_str(&payload)
            .unwrap()
            .collection
    }

    fn raws(steps: &TimeSteps) -> Vec<&str> {
        steps.as_slice().iter().map(|s| s.raw.as_str()).collect()
    }

    #[test]
    fn steps_are_unique_and_chronological() {
        let fc = collection(&["2023-01-02", "2023-01-01", "2023-01-02"]);
        let steps = TimeSteps::derive(&fc);
        assert_eq!(raws(&steps), vec!["2023-01-01", "2023-01-02"]);
    }

    #[test]
    fn derives_many_distinct_steps() {
        let stamps: Vec<String> = (0..20_000u32)
            .rev()
            .map(|i| format!("2023-01-01T{:02}:{:02}:{:02}Z", i / 3600, (i / 60) % 60, i % 60))
            .collect();
        let mut refs: Vec<&str> = stamps.iter().map(String::as_str).collect();
        refs.extend(stamps.iter().take(100).map(String::as_str));
        let steps = TimeSteps::derive(&collection(&refs));
        assert_eq!(steps.len(), 20_000);
        assert_eq!(steps.get(0).unwrap().raw, "2023-01-01T00:00:00Z");
        assert_eq!(steps.get(19_999).unwrap().raw, "2023-01-01T05:33:19Z");
    }

    #[test]
    fn sorts_by_time_not_text_and_unparsable_last() {
        let fc = collection(&["later", "2023-01-01T10:00:00Z", "2023-01-01T09:00:00+02:00"]);
        let steps = TimeSteps::derive(&fc);
        assert_eq!(
            raws(&steps),
            vec!["2023-01-01T09:00:00+02:00", "2023-01-01T10:00:00Z", "later"]
        );
    }

    #[test]
    fn ticks_advance_and_wrap() {
        let mut tl = Timeline::new(1.0);
        tl.reset_for(&collection(&["2023-01-01", "2023-01-02", "2023-01-03"]));
        assert_eq!(tl.cursor().unwrap().raw, "2023-01-01");
        assert_eq!(tl.progress(), Some((1, 3)));

        // Stopped: ticks are ignored.
        assert!(!tl.advance(5.0));
        assert_eq!(tl.index(), 0);

        assert!(tl.play());
        assert_eq!(tl.state(), PlaybackState::Playing);
        assert!(tl.advance(1.0));
        assert!(tl.advance(1.0));
        assert_eq!(tl.index(), 2);
        assert!(tl.advance(1.0));
        assert_eq!(tl.index(), 0);
    }

    #[test]
    fn pause_stops_ticks_and_play_twice_does_not_double_speed() {
        let mut tl = Timeline::new(1.0);
        tl.reset_for(&collection(&["2023-01-01", "2023-01-02", "2023-01-03"]));
        tl.play();
        assert!(!tl.play());
        tl.advance(1.0);
        assert_eq!(tl.index(), 1);
        assert!(tl.pause());
        assert!(!tl.pause());
        tl.advance(10.0);
        assert_eq!(tl.index(), 1);
    }

    #[test]
    fn new_collection_resets_cursor_and_stops() {
        let mut tl = Timeline::new(1.0);
        tl.reset_for(&collection(&["2023-01-01", "2023-01-02"]));
        tl.play();
        tl.advance(1.0);
        assert_eq!(tl.index(), 1);

        tl.reset_for(&collection(&["2024-01-01"]));
        assert_eq!(tl.index(), 0);
        assert_eq!(tl.state(), PlaybackState::Stopped);
    }

    #[test]
    fn toggle_and_restart() {
        let mut tl = Timeline::new(1.0);
        tl.reset_for(&collection(&["2023-01-01", "2023-01-02"]));
        assert_eq!(tl.toggle(), PlaybackState::Playing);
        tl.advance(1.0);
        assert_eq!(tl.toggle(), PlaybackState::Stopped);
        assert_eq!(tl.index(), 1);

        tl.play();
        tl.restart();
        assert_eq!(tl.index(), 0);
        assert!(!tl.is_playing());
    }

    #[test]
    fn empty_timeline_cannot_play() {
        let mut tl = Timeline::default();
        assert!(!tl.play());
        assert_eq!(tl.cursor(), None);
        assert_eq!(tl.progress(), None);
        assert!(!tl.step_forward());
    }
}

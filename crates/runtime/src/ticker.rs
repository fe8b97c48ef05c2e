/// A cancellable fixed-period tick source.
///
/// The ticker owns no thread or timer. The host feeds it elapsed time through
/// [`Ticker::advance`] (from a frame callback or an interval), which keeps
/// playback deterministic and replayable in tests.
///
/// Contract:
/// - `start` while running is a no-op (never two overlapping schedules).
/// - `stop` while stopped is a no-op.
/// - After `stop`, no tick is reported until the next `start`, and time
///   accumulated before the stop is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    period_s: f64,
    elapsed_s: f64,
    running: bool,
}

impl Ticker {
    /// `period_s` must be positive; non-positive or non-finite periods fall back to 1s.
    pub fn new(period_s: f64) -> Self {
        let period_s = if period_s.is_finite() && period_s > 0.0 {
            period_s
        } else {
            1.0
        };
        Self {
            period_s,
            elapsed_s: 0.0,
            running: false,
        }
    }

    pub fn period_s(&self) -> f64 {
        self.period_s
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `true` if the ticker was stopped before.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.elapsed_s = 0.0;
        true
    }

    /// Returns `true` if the ticker was running before.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.elapsed_s = 0.0;
        true
    }

    /// Feeds `dt_s` seconds and returns how many whole periods elapsed.
    ///
    /// Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, dt_s: f64) -> u32 {
        if !self.running || !dt_s.is_finite() || dt_s <= 0.0 {
            return 0;
        }
        self.elapsed_s += dt_s;
        if !self.elapsed_s.is_finite() {
            self.elapsed_s = 0.0;
            return u32::MAX;
        }
        if self.elapsed_s < self.period_s {
            return 0;
        }
        let whole = (self.elapsed_s / self.period_s).floor();
        self.elapsed_s = self.elapsed_s.rem_euclid(self.period_s);
        // Float-to-int casts saturate.
        whole as u32
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(1.0)
    }
}

use crate::classifier::Verdict;
use std::time::Duration;

/// Running scorecard of one reading session.
///
/// Durations are kept as [`Duration`] so that uniform ticks add up exactly:
/// one hundred 100 ms ticks are ten seconds, not 9.9999. The too-quiet time
/// is never stored; it is whatever part of the total is neither good nor
/// too loud.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    duration: Duration,
    valid_duration: Duration,
    too_loud_duration: Duration,
    trees_planted: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account one classified tick. Returns true when this tick completed a
    /// tree.
    pub fn record(&mut self, verdict: Verdict, delta: Duration, tree_cycle: Duration) -> bool {
        self.duration += delta;
        match verdict {
            Verdict::TooLoud => {
                self.too_loud_duration += delta;
                false
            }
            Verdict::Good => {
                self.valid_duration += delta;
                let before = self.trees_planted;
                self.trees_planted = trees_for(self.valid_duration, tree_cycle);
                self.trees_planted > before
            }
            Verdict::TooQuiet => false,
        }
    }

    /// Zero all counters at once.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn valid_duration(&self) -> Duration {
        self.valid_duration
    }

    pub fn too_loud_duration(&self) -> Duration {
        self.too_loud_duration
    }

    pub fn too_quiet_duration(&self) -> Duration {
        self.duration - self.valid_duration - self.too_loud_duration
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    pub fn valid_duration_seconds(&self) -> f64 {
        self.valid_duration.as_secs_f64()
    }

    pub fn too_loud_duration_seconds(&self) -> f64 {
        self.too_loud_duration.as_secs_f64()
    }

    pub fn too_quiet_duration_seconds(&self) -> f64 {
        self.too_quiet_duration().as_secs_f64()
    }

    pub fn trees_planted(&self) -> u64 {
        self.trees_planted
    }

    /// Progress through the current tree, in `[0, 100)`. Wraps to zero the
    /// moment a tree completes.
    pub fn growth_percentage(&self, tree_cycle: Duration) -> f64 {
        let cycle = tree_cycle.as_nanos();
        if cycle == 0 {
            return 0.0;
        }
        let into_cycle = self.valid_duration.as_nanos() % cycle;
        (into_cycle as f64 / cycle as f64 * 100.0).min(100.0)
    }

    /// Share of the session spent at good volume, in percent.
    pub fn valid_percentage(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        self.valid_duration.as_secs_f64() / self.duration.as_secs_f64() * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.duration.is_zero()
    }
}

/// Whole trees earned by `valid` seconds of good volume.
pub fn trees_for(valid: Duration, tree_cycle: Duration) -> u64 {
    let cycle = tree_cycle.as_nanos();
    if cycle == 0 {
        return 0;
    }
    (valid.as_nanos() / cycle) as u64
}

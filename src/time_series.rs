use crate::util::{mean, std_dev};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPoint {
    pub t: f64,
    pub db: f64,
}

impl LevelPoint {
    pub fn new(t: f64, db: f64) -> Self {
        Self { t, db }
    }
}

impl From<(f64, f64)> for LevelPoint {
    fn from(v: (f64, f64)) -> Self {
        LevelPoint { t: v.0, db: v.1 }
    }
}

impl From<LevelPoint> for (f64, f64) {
    fn from(p: LevelPoint) -> Self {
        (p.t, p.db)
    }
}

/// Average loudness and how much it wandered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSummary {
    pub mean_db: f64,
    pub std_dev_db: f64,
}

/// Most points kept for one session. About seven minutes at the default tick
/// rate before the history starts thinning itself.
pub const MAX_HISTORY_POINTS: usize = 4096;

/// Raw levels recorded by the front-end during a reading session, kept for
/// the results chart. Not part of the engine state.
///
/// When full, every other point is dropped and from then on only every
/// `stride`-th sample is kept, so memory stays bounded and the chart still
/// spans the whole session.
#[derive(Debug, Clone)]
pub struct LevelHistory {
    points: Vec<LevelPoint>,
    capacity: usize,
    stride: usize,
    skipped: usize,
}

impl Default for LevelHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY_POINTS)
    }
}

impl LevelHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::new(),
            capacity: capacity.max(2),
            stride: 1,
            skipped: 0,
        }
    }

    pub fn push(&mut self, t: f64, db: f64) {
        self.skipped += 1;
        if self.skipped < self.stride {
            return;
        }
        self.skipped = 0;
        self.points.push(LevelPoint::new(t, db));

        if self.points.len() > self.capacity {
            let mut keep = false;
            self.points.retain(|_| {
                keep = !keep;
                keep
            });
            self.stride *= 2;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.stride = 1;
        self.skipped = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[LevelPoint] {
        &self.points
    }

    /// Points as `(t, db)` pairs for chart datasets.
    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.points.iter().copied().map(Into::into).collect()
    }

    pub fn summary(&self) -> Option<LevelSummary> {
        let levels: Vec<f64> = self.points.iter().map(|p| p.db).collect();
        Some(LevelSummary {
            mean_db: mean(&levels)?,
            std_dev_db: std_dev(&levels)?,
        })
    }
}

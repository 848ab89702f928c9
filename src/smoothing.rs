/// Exponential moving average step. `alpha` is the weight of the new sample.
pub fn smooth(previous: f64, raw_sample: f64, alpha: f64) -> f64 {
    previous * (1.0 - alpha) + raw_sample * alpha
}

/// Display-only smoothing of the raw level stream. Has no effect on scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSmoother {
    alpha: f64,
    value: f64,
}

impl SignalSmoother {
    pub fn new(alpha: f64, initial: f64) -> Self {
        Self {
            alpha,
            value: initial,
        }
    }

    pub fn update(&mut self, raw_sample: f64) -> f64 {
        self.value = smooth(self.value, raw_sample, self.alpha);
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn reset_to(&mut self, value: f64) {
        self.value = value;
    }
}

//! Level sensors: the engine's only input signal.
//!
//! A sensor owns the capture device and answers "how loud is it right now"
//! in dBFS. The engine never touches samples directly.

use crate::error::SensorAcquisitionError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Floor sentinel returned when no signal is available.
pub const MIN_DECIBELS: f64 = -100.0;

/// Source of instantaneous loudness readings.
pub trait LevelSensor {
    /// Open the capture device. Calling this on an active sensor is a no-op.
    fn acquire(&mut self) -> Result<(), SensorAcquisitionError>;

    /// Close the capture device. Calling this on an inactive sensor is a no-op.
    fn release(&mut self);

    fn is_active(&self) -> bool;

    /// Current loudness in `[MIN_DECIBELS, 0]`.
    fn current_level_db(&mut self) -> f64;
}

impl<S: LevelSensor + ?Sized> LevelSensor for Box<S> {
    fn acquire(&mut self) -> Result<(), SensorAcquisitionError> {
        (**self).acquire()
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn current_level_db(&mut self) -> f64 {
        (**self).current_level_db()
    }
}

/// Clamp an arbitrary reading into the sensor range. NaN maps to the floor.
pub fn clamp_db(db: f64) -> f64 {
    if db.is_nan() {
        MIN_DECIBELS
    } else {
        db.clamp(MIN_DECIBELS, 0.0)
    }
}

/// RMS level of a block of samples in dBFS.
pub fn rms_db(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return MIN_DECIBELS;
    }
    let energy: f64 = samples
        .iter()
        .map(|&s| (s as f64) * (s as f64))
        .sum::<f64>()
        / samples.len() as f64;
    let rms = energy.sqrt().max(1e-9);
    clamp_db(20.0 * rms.log10())
}

/// Replays a fixed list of readings, repeating the last one once exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedSensor {
    levels: Vec<f64>,
    cursor: usize,
    active: bool,
    acquire_error: Option<SensorAcquisitionError>,
    pub acquire_calls: usize,
    release_calls: Rc<Cell<usize>>,
}

impl ScriptedSensor {
    pub fn new(levels: Vec<f64>) -> Self {
        Self {
            levels,
            cursor: 0,
            active: false,
            acquire_error: None,
            acquire_calls: 0,
            release_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn constant(db: f64) -> Self {
        Self::new(vec![db])
    }

    /// Make every `acquire` fail with `err` until cleared.
    pub fn failing(mut self, err: SensorAcquisitionError) -> Self {
        self.acquire_error = Some(err);
        self
    }

    pub fn clear_failure(&mut self) {
        self.acquire_error = None;
    }

    pub fn release_calls(&self) -> usize {
        self.release_calls.get()
    }

    /// Shared release count that outlives the sensor, e.g. across a drop.
    pub fn release_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.release_calls)
    }

    /// Swap the remaining script, e.g. to move from silence to speech mid-test.
    pub fn set_levels(&mut self, levels: Vec<f64>) {
        self.levels = levels;
        self.cursor = 0;
    }
}

impl LevelSensor for ScriptedSensor {
    fn acquire(&mut self) -> Result<(), SensorAcquisitionError> {
        self.acquire_calls += 1;
        if let Some(err) = &self.acquire_error {
            return Err(err.clone());
        }
        self.active = true;
        Ok(())
    }

    fn release(&mut self) {
        if self.active {
            self.release_calls.set(self.release_calls.get() + 1);
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn current_level_db(&mut self) -> f64 {
        if !self.active || self.levels.is_empty() {
            return MIN_DECIBELS;
        }
        let idx = self.cursor.min(self.levels.len() - 1);
        if self.cursor < self.levels.len() {
            self.cursor += 1;
        }
        clamp_db(self.levels[idx])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Pause,
    Speech,
    Shout,
}

/// Synthesises a plausible read-aloud level stream: room tone with pauses,
/// sentences of speech and the odd shout. Used when no microphone is built in.
#[derive(Debug)]
pub struct SimulatedSensor {
    rng: StdRng,
    active: bool,
    phase: Phase,
    phase_ticks_left: u32,
    ambient_db: f64,
    speech_db: f64,
}

impl SimulatedSensor {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            active: false,
            phase: Phase::Pause,
            phase_ticks_left: 30,
            ambient_db: -58.0,
            speech_db: -40.0,
        }
    }

    fn next_phase(&mut self) {
        let roll: f64 = self.rng.gen();
        let current = self.phase;
        let (phase, ticks) = match current {
            Phase::Speech if roll < 0.05 => (Phase::Shout, self.rng.gen_range(3..10)),
            Phase::Speech => (Phase::Pause, self.rng.gen_range(3..15)),
            Phase::Pause | Phase::Shout => (Phase::Speech, self.rng.gen_range(20..80)),
        };
        self.phase = phase;
        self.phase_ticks_left = ticks;
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelSensor for SimulatedSensor {
    fn acquire(&mut self) -> Result<(), SensorAcquisitionError> {
        debug!("simulated sensor acquired");
        self.active = true;
        Ok(())
    }

    fn release(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn current_level_db(&mut self) -> f64 {
        if !self.active {
            return MIN_DECIBELS;
        }
        if self.phase_ticks_left == 0 {
            self.next_phase();
        }
        self.phase_ticks_left -= 1;

        let jitter = self.rng.gen_range(-3.0..3.0);
        let level = match self.phase {
            Phase::Pause => self.ambient_db,
            Phase::Speech => self.speech_db + self.rng.gen_range(-8.0..8.0),
            Phase::Shout => -8.0,
        };
        clamp_db(level + jitter)
    }
}

#[cfg(feature = "microphone")]
pub use mic::MicrophoneSensor;

#[cfg(feature = "microphone")]
mod mic {
    use super::{rms_db, LevelSensor, MIN_DECIBELS};
    use crate::error::SensorAcquisitionError;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::SampleFormat;
    use std::sync::{Arc, Mutex};
    use tracing::{info, warn};

    /// Samples kept between two level reads (about a second at 48 kHz).
    const MAX_PENDING_SAMPLES: usize = 48_000;

    /// Default input device via cpal. The callback downmixes into a shared
    /// buffer; each level read drains it and reports its RMS.
    pub struct MicrophoneSensor {
        stream: Option<cpal::Stream>,
        pending: Arc<Mutex<Vec<f32>>>,
        last_db: f64,
    }

    impl MicrophoneSensor {
        pub fn new() -> Self {
            Self {
                stream: None,
                pending: Arc::new(Mutex::new(Vec::new())),
                last_db: MIN_DECIBELS,
            }
        }
    }

    impl Default for MicrophoneSensor {
        fn default() -> Self {
            Self::new()
        }
    }

    fn unavailable(err: impl std::fmt::Display) -> SensorAcquisitionError {
        SensorAcquisitionError::DeviceUnavailable {
            details: err.to_string(),
        }
    }

    fn push_downmixed<T: Copy>(
        pending: &Mutex<Vec<f32>>,
        data: &[T],
        channels: usize,
        convert: impl Fn(T) -> f32,
    ) {
        if let Ok(mut buf) = pending.lock() {
            for frame in data.chunks(channels.max(1)) {
                let sum: f32 = frame.iter().map(|&s| convert(s)).sum();
                buf.push(sum / frame.len() as f32);
            }
            if buf.len() > MAX_PENDING_SAMPLES {
                let excess = buf.len() - MAX_PENDING_SAMPLES;
                buf.drain(..excess);
            }
        }
    }

    impl LevelSensor for MicrophoneSensor {
        fn acquire(&mut self) -> Result<(), SensorAcquisitionError> {
            if self.stream.is_some() {
                return Ok(());
            }
            let host = cpal::default_host();
            let device =
                host.default_input_device()
                    .ok_or_else(|| SensorAcquisitionError::Unsupported {
                        reason: "no default input device".to_string(),
                    })?;
            let supported = device.default_input_config().map_err(unavailable)?;
            let channels = supported.channels() as usize;
            let config = supported.config();
            let err_fn = |err| warn!("microphone stream error: {}", err);

            let stream = match supported.sample_format() {
                SampleFormat::F32 => {
                    let pending = Arc::clone(&self.pending);
                    device.build_input_stream(
                        &config,
                        move |data: &[f32], _| push_downmixed(&pending, data, channels, |s| s),
                        err_fn,
                        None,
                    )
                }
                SampleFormat::I16 => {
                    let pending = Arc::clone(&self.pending);
                    device.build_input_stream(
                        &config,
                        move |data: &[i16], _| {
                            push_downmixed(&pending, data, channels, |s| s as f32 / 32_768.0)
                        },
                        err_fn,
                        None,
                    )
                }
                SampleFormat::U16 => {
                    let pending = Arc::clone(&self.pending);
                    device.build_input_stream(
                        &config,
                        move |data: &[u16], _| {
                            push_downmixed(&pending, data, channels, |s| {
                                (s as f32 - 32_768.0) / 32_768.0
                            })
                        },
                        err_fn,
                        None,
                    )
                }
                other => {
                    return Err(SensorAcquisitionError::Unsupported {
                        reason: format!("sample format {:?}", other),
                    })
                }
            }
            .map_err(unavailable)?;

            stream.play().map_err(unavailable)?;
            let name = device.name().unwrap_or_default();
            info!(device = name.as_str(), "microphone acquired");
            self.stream = Some(stream);
            Ok(())
        }

        fn release(&mut self) {
            if let Some(stream) = self.stream.take() {
                if let Err(err) = stream.pause() {
                    warn!("failed to pause microphone stream: {}", err);
                }
            }
            if let Ok(mut buf) = self.pending.lock() {
                buf.clear();
            }
            self.last_db = MIN_DECIBELS;
        }

        fn is_active(&self) -> bool {
            self.stream.is_some()
        }

        fn current_level_db(&mut self) -> f64 {
            if self.stream.is_none() {
                return MIN_DECIBELS;
            }
            if let Ok(mut buf) = self.pending.lock() {
                if !buf.is_empty() {
                    self.last_db = rms_db(&buf);
                    buf.clear();
                }
            }
            self.last_db
        }
    }
}

//! The session engine: owns the mode, gates the tick loop, and turns level
//! readings into calibration results and scorecard updates.

use crate::calibration::{CalibrationRun, NoiseFloor};
use crate::classifier::{classify, Verdict, VolumeStatus};
use crate::error::{log_sensor_error, ErrorCode, SensorAcquisitionError};
use crate::runtime::{Clock, SystemClock, TickTimer};
use crate::sensor::{LevelSensor, MIN_DECIBELS};
use crate::session::{SessionConfig, SessionSnapshot, SessionState};
use crate::smoothing::SignalSmoother;
use crate::stats::SessionStats;
use tracing::{debug, info};

/// What one tick did. The front-end uses it to trigger decorations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickReport {
    /// Timer disarmed or not in a ticking state; nothing happened
    Inactive,
    /// Calibration window still open
    Calibrating { raw_db: f64, progress: f64 },
    /// Calibration window closed; engine is back to `Idle`
    Calibrated(NoiseFloor),
    /// One reading sample was classified and accounted
    Sampled {
        raw_db: f64,
        verdict: Verdict,
        tree_completed: bool,
    },
}

/// Session state machine over a level sensor.
///
/// All actions and ticks run on one thread; the engine is never shared.
#[derive(Debug)]
pub struct Engine<S: LevelSensor, C: Clock = SystemClock> {
    sensor: S,
    clock: C,
    config: SessionConfig,
    state: SessionState,
    timer: TickTimer,
    smoother: SignalSmoother,
    noise_floor: NoiseFloor,
    calibration: Option<CalibrationRun>,
    stats: SessionStats,
    last_verdict: Option<Verdict>,
    last_error: Option<SensorAcquisitionError>,
}

impl<S: LevelSensor> Engine<S, SystemClock> {
    pub fn with_system_clock(sensor: S, config: SessionConfig) -> Self {
        Self::new(sensor, SystemClock, config)
    }
}

impl<S: LevelSensor, C: Clock> Engine<S, C> {
    pub fn new(sensor: S, clock: C, config: SessionConfig) -> Self {
        let config = config.sanitized();
        Self {
            sensor,
            clock,
            state: SessionState::Idle,
            timer: TickTimer::new(config.tick_period()),
            smoother: SignalSmoother::new(config.smoothing_alpha, MIN_DECIBELS),
            noise_floor: config.default_noise_floor(),
            calibration: None,
            stats: SessionStats::new(),
            last_verdict: None,
            last_error: None,
            config,
        }
    }

    fn acquire_sensor(&mut self, context: &str) -> Result<(), SensorAcquisitionError> {
        if self.sensor.is_active() {
            return Ok(());
        }
        if let Err(err) = self.sensor.acquire() {
            log_sensor_error(&err, context);
            self.last_error = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }

    fn enter(&mut self, next: SessionState) {
        info!(from = %self.state, to = %next, "session transition");
        self.state = next;
        if next.is_ticking() {
            self.timer.arm();
        } else {
            self.timer.disarm();
        }
    }

    /// Begin a calibration window. From `Calibrating` this restarts the
    /// window, discarding the run in progress.
    pub fn start_calibration(&mut self) -> Result<(), SensorAcquisitionError> {
        if !matches!(self.state, SessionState::Idle | SessionState::Calibrating) {
            debug!(state = %self.state, "start_calibration ignored");
            return Ok(());
        }
        self.acquire_sensor("start_calibration")?;
        self.last_error = None;
        self.calibration = Some(CalibrationRun::new(
            self.clock.now(),
            self.config.calibration_window(),
        ));
        self.enter(SessionState::Calibrating);
        Ok(())
    }

    pub fn start_reading(&mut self) -> Result<(), SensorAcquisitionError> {
        if self.state != SessionState::Idle {
            debug!(state = %self.state, "start_reading ignored");
            return Ok(());
        }
        self.acquire_sensor("start_reading")?;
        self.last_error = None;
        self.last_verdict = None;
        self.enter(SessionState::Reading);
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.state != SessionState::Reading {
            debug!(state = %self.state, "stop ignored");
            return;
        }
        self.enter(SessionState::Completed);
        self.sensor.release();
        info!(
            duration_secs = self.stats.duration_seconds(),
            valid_secs = self.stats.valid_duration_seconds(),
            trees = self.stats.trees_planted(),
            "session completed"
        );
    }

    /// Back to a fresh `Idle` session from any state. The noise floor survives.
    pub fn reset(&mut self) {
        self.enter(SessionState::Idle);
        self.calibration = None;
        self.sensor.release();
        self.stats.reset();
        self.last_verdict = None;
        self.last_error = None;
        self.smoother.reset_to(MIN_DECIBELS);
    }

    pub fn continue_to_new_session(&mut self) {
        if self.state != SessionState::Completed {
            debug!(state = %self.state, "continue ignored");
            return;
        }
        self.stats.reset();
        self.last_verdict = None;
        self.enter(SessionState::Idle);
    }

    /// Advance one tick period. Does nothing unless the timer is armed.
    pub fn on_tick(&mut self) -> TickReport {
        if !self.timer.is_armed() {
            return TickReport::Inactive;
        }
        match self.state {
            SessionState::Calibrating => self.calibration_tick(),
            SessionState::Reading => self.reading_tick(),
            _ => TickReport::Inactive,
        }
    }

    fn calibration_tick(&mut self) -> TickReport {
        let raw_db = self.sensor.current_level_db();
        self.smoother.update(raw_db);
        let now = self.clock.now();

        let Some(run) = self.calibration.as_mut() else {
            return TickReport::Inactive;
        };
        run.observe(raw_db);
        if !run.is_expired(now) {
            return TickReport::Calibrating {
                raw_db,
                progress: run.progress(now),
            };
        }

        let run = *run;
        self.calibration = None;
        self.noise_floor = run.finish(self.noise_floor);
        info!(
            noise_floor_db = self.noise_floor.db(),
            raw_db, "calibration complete"
        );
        self.enter(SessionState::Idle);
        TickReport::Calibrated(self.noise_floor)
    }

    fn reading_tick(&mut self) -> TickReport {
        let raw_db = self.sensor.current_level_db();
        self.smoother.update(raw_db);
        let verdict = classify(
            raw_db,
            self.noise_floor.db(),
            self.config.target_offset_db,
            self.config.scream_threshold_db,
        );
        // Each tick credits one fixed period even when it fired late;
        // calibration alone runs on the clock.
        let tree_completed =
            self.stats
                .record(verdict, self.timer.period(), self.config.tree_cycle());
        self.last_verdict = Some(verdict);
        if tree_completed {
            info!(trees = self.stats.trees_planted(), "tree completed");
        }
        TickReport::Sampled {
            raw_db,
            verdict,
            tree_completed,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn noise_floor(&self) -> NoiseFloor {
        self.noise_floor
    }

    pub fn target_threshold_db(&self) -> f64 {
        self.noise_floor.target_threshold(self.config.target_offset_db)
    }

    pub fn growth_percentage(&self) -> f64 {
        self.stats.growth_percentage(self.config.tree_cycle())
    }

    pub fn smoothed_db(&self) -> f64 {
        self.smoother.value()
    }

    pub fn volume_status(&self) -> VolumeStatus {
        match self.state {
            SessionState::Calibrating => VolumeStatus::Calibrating,
            SessionState::Reading => self
                .last_verdict
                .map(VolumeStatus::from)
                .unwrap_or(VolumeStatus::Idle),
            SessionState::Idle | SessionState::Paused | SessionState::Completed => {
                VolumeStatus::Idle
            }
        }
    }

    pub fn last_error(&self) -> Option<&SensorAcquisitionError> {
        self.last_error.as_ref()
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn calibration_progress(&self) -> Option<f64> {
        self.calibration
            .as_ref()
            .map(|run| run.progress(self.clock.now()))
    }

    /// Pull-based view of everything the presentation layer may show.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            smoothed_db: self.smoothed_db(),
            noise_floor_db: self.noise_floor.db(),
            target_threshold_db: self.target_threshold_db(),
            scream_threshold_db: self.config.scream_threshold_db,
            stats: self.stats,
            growth_percentage: self.growth_percentage(),
            volume_status: self.volume_status(),
            calibration_progress: self.calibration_progress(),
            last_error: self.last_error.as_ref().map(|e| e.message()),
        }
    }
}

impl<S: LevelSensor, C: Clock> Drop for Engine<S, C> {
    fn drop(&mut self) {
        self.timer.disarm();
        self.sensor.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ManualClock;
    use crate::sensor::ScriptedSensor;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn engine_with(sensor: ScriptedSensor) -> (Engine<ScriptedSensor, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let engine = Engine::new(sensor, clock.clone(), SessionConfig::default());
        (engine, clock)
    }

    /// Tick once per period, advancing the clock first, like the real loop.
    fn tick(engine: &mut Engine<ScriptedSensor, ManualClock>, clock: &ManualClock) -> TickReport {
        clock.advance(engine.config().tick_period());
        engine.on_tick()
    }

    fn calibrate_with(db: f64) -> NoiseFloor {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(db));
        engine.start_calibration().unwrap();
        for _ in 0..100 {
            if let TickReport::Calibrated(floor) = tick(&mut engine, &clock) {
                return floor;
            }
        }
        panic!("calibration never finished");
    }

    #[test]
    fn test_new_engine_is_idle_with_default_floor() {
        let (engine, _) = engine_with(ScriptedSensor::constant(-50.0));
        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!(engine.noise_floor().db(), -60.0);
        assert_eq!(engine.target_threshold_db(), -50.0);
        assert_eq!(engine.volume_status(), VolumeStatus::Idle);
        assert!(!engine.is_timer_armed());
        assert!(engine.stats().is_empty());
    }

    #[test]
    fn test_calibration_constant_inside_range() {
        assert_eq!(calibrate_with(-45.0).db(), -45.0);
    }

    #[test]
    fn test_calibration_clamps_silence() {
        assert_eq!(calibrate_with(-95.0).db(), -80.0);
    }

    #[test]
    fn test_calibration_clamps_full_scale() {
        assert_eq!(calibrate_with(-5.0).db(), -30.0);
    }

    #[test]
    fn test_quiet_room_then_speech_counts_as_good() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-72.0));
        engine.start_calibration().unwrap();
        while engine.state() == SessionState::Calibrating {
            tick(&mut engine, &clock);
        }
        assert_eq!(engine.target_threshold_db(), -62.0);

        // Same device, now someone starts reading
        engine.sensor_mut().set_levels(vec![-58.0]);
        engine.start_reading().unwrap();
        assert_matches!(
            tick(&mut engine, &clock),
            TickReport::Sampled {
                verdict: Verdict::Good,
                ..
            }
        );
        assert_eq!(engine.sensor().acquire_calls, 1);
    }

    #[test]
    fn test_calibration_takes_last_sample() {
        let (mut engine, clock) = engine_with(ScriptedSensor::new(vec![
            -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0,
            -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0, -70.0,
            -70.0, -70.0, -70.0, -70.0, -70.0, -48.0,
        ]));
        engine.start_calibration().unwrap();
        let mut last = TickReport::Inactive;
        for _ in 0..30 {
            last = tick(&mut engine, &clock);
        }
        assert_eq!(last, TickReport::Calibrated(NoiseFloor::from_db(-48.0)));
    }

    #[test]
    fn test_calibration_returns_to_idle_and_disarms() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-55.0));
        engine.start_calibration().unwrap();
        assert_eq!(engine.state(), SessionState::Calibrating);
        assert_eq!(engine.volume_status(), VolumeStatus::Calibrating);
        assert!(engine.is_timer_armed());

        for _ in 0..29 {
            assert_matches!(tick(&mut engine, &clock), TickReport::Calibrating { .. });
        }
        assert_eq!(
            tick(&mut engine, &clock),
            TickReport::Calibrated(NoiseFloor::from_db(-55.0))
        );
        assert_eq!(engine.state(), SessionState::Idle);
        assert!(!engine.is_timer_armed());
        assert_eq!(engine.target_threshold_db(), -45.0);
        // Further ticks are inert
        assert_eq!(tick(&mut engine, &clock), TickReport::Inactive);
    }

    #[test]
    fn test_restarting_calibration_discards_prior_run() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-50.0));
        engine.start_calibration().unwrap();
        for _ in 0..20 {
            tick(&mut engine, &clock);
        }
        engine.start_calibration().unwrap();
        assert_eq!(engine.calibration_progress(), Some(0.0));

        // The new run needs its own full window
        for _ in 0..29 {
            assert_matches!(tick(&mut engine, &clock), TickReport::Calibrating { .. });
        }
        assert_matches!(tick(&mut engine, &clock), TickReport::Calibrated(_));
    }

    #[test]
    fn test_calibration_acquisition_failure_keeps_idle() {
        let sensor = ScriptedSensor::constant(-50.0).failing(SensorAcquisitionError::PermissionDenied);
        let (mut engine, clock) = engine_with(sensor);

        let result = engine.start_calibration();

        assert_eq!(result, Err(SensorAcquisitionError::PermissionDenied));
        assert_eq!(engine.state(), SessionState::Idle);
        assert!(!engine.is_timer_armed());
        assert_eq!(engine.last_error(), Some(&SensorAcquisitionError::PermissionDenied));
        assert_eq!(tick(&mut engine, &clock), TickReport::Inactive);
        assert!(engine.snapshot().last_error.is_some());
    }

    #[test]
    fn test_reading_acquisition_failure_keeps_idle_and_retry_succeeds() {
        let sensor = ScriptedSensor::constant(-40.0).failing(SensorAcquisitionError::Unsupported {
            reason: "headless".to_string(),
        });
        let (mut engine, _) = engine_with(sensor);

        assert!(engine.start_reading().is_err());
        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!(engine.sensor().acquire_calls, 1);

        engine.sensor_mut().clear_failure();
        engine.start_reading().unwrap();
        assert_eq!(engine.state(), SessionState::Reading);
        assert!(engine.last_error().is_none());
        assert_eq!(engine.sensor().acquire_calls, 2);
    }

    #[test]
    fn test_reading_reuses_sensor_from_calibration() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-60.0));
        engine.start_calibration().unwrap();
        while engine.state() == SessionState::Calibrating {
            tick(&mut engine, &clock);
        }
        engine.start_reading().unwrap();
        assert_eq!(engine.sensor().acquire_calls, 1);
    }

    #[test]
    fn test_reading_accumulates_by_verdict() {
        // floor -60, target -50, scream -15
        let (mut engine, clock) = engine_with(ScriptedSensor::new(vec![-50.0, -70.0, -10.0, -15.0]));
        engine.start_reading().unwrap();

        assert_matches!(
            tick(&mut engine, &clock),
            TickReport::Sampled { verdict: Verdict::Good, .. }
        );
        assert_eq!(engine.volume_status(), VolumeStatus::Good);
        assert_matches!(
            tick(&mut engine, &clock),
            TickReport::Sampled { verdict: Verdict::TooQuiet, .. }
        );
        assert_eq!(engine.volume_status(), VolumeStatus::Quiet);
        assert_matches!(
            tick(&mut engine, &clock),
            TickReport::Sampled { verdict: Verdict::TooLoud, .. }
        );
        assert_eq!(engine.volume_status(), VolumeStatus::Loud);
        assert_matches!(
            tick(&mut engine, &clock),
            TickReport::Sampled { verdict: Verdict::Good, .. }
        );

        let stats = engine.stats();
        assert_eq!(stats.duration(), Duration::from_millis(400));
        assert_eq!(stats.valid_duration(), Duration::from_millis(200));
        assert_eq!(stats.too_loud_duration(), Duration::from_millis(100));
        assert_eq!(stats.too_quiet_duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_hundred_good_ticks_plant_one_tree() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-40.0));
        engine.start_reading().unwrap();

        let mut completions = 0;
        for _ in 0..100 {
            if let TickReport::Sampled { tree_completed: true, .. } = tick(&mut engine, &clock) {
                completions += 1;
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(engine.stats().trees_planted(), 1);
        assert_eq!(engine.stats().valid_duration_seconds(), 10.0);
        assert_eq!(engine.growth_percentage(), 0.0);
    }

    #[test]
    fn test_stop_completes_and_releases_sensor() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-40.0));
        engine.start_reading().unwrap();
        for _ in 0..5 {
            tick(&mut engine, &clock);
        }
        engine.stop();

        assert_eq!(engine.state(), SessionState::Completed);
        assert!(!engine.is_timer_armed());
        assert!(!engine.sensor().is_active());
        assert_eq!(engine.sensor().release_calls(), 1);
        // Stats stay visible on the results screen
        assert_eq!(engine.stats().duration(), Duration::from_millis(500));
        assert_eq!(tick(&mut engine, &clock), TickReport::Inactive);
    }

    #[test]
    fn test_continue_resets_stats_to_idle() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-40.0));
        engine.start_reading().unwrap();
        for _ in 0..150 {
            tick(&mut engine, &clock);
        }
        engine.stop();
        engine.continue_to_new_session();

        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!(*engine.stats(), SessionStats::default());
    }

    #[test]
    fn test_reset_from_every_state_zeroes_stats() {
        let states = [
            SessionState::Idle,
            SessionState::Calibrating,
            SessionState::Reading,
            SessionState::Paused,
            SessionState::Completed,
        ];
        for target in states {
            let (mut engine, clock) = engine_with(ScriptedSensor::constant(-40.0));
            engine.start_reading().unwrap();
            for _ in 0..120 {
                tick(&mut engine, &clock);
            }
            match target {
                SessionState::Idle => {
                    engine.stop();
                    engine.continue_to_new_session();
                }
                SessionState::Calibrating => {
                    engine.stop();
                    engine.continue_to_new_session();
                    engine.start_calibration().unwrap();
                }
                SessionState::Reading => {}
                SessionState::Paused => {
                    engine.timer.disarm();
                    engine.state = SessionState::Paused;
                }
                SessionState::Completed => engine.stop(),
            }
            assert_eq!(engine.state(), target);

            engine.reset();

            assert_eq!(engine.state(), SessionState::Idle, "from {}", target);
            let stats = engine.stats();
            assert_eq!(stats.duration_seconds(), 0.0);
            assert_eq!(stats.valid_duration_seconds(), 0.0);
            assert_eq!(stats.too_loud_duration_seconds(), 0.0);
            assert_eq!(stats.trees_planted(), 0);
            assert!(!engine.is_timer_armed());
            assert!(!engine.sensor().is_active());
            assert_eq!(tick(&mut engine, &clock), TickReport::Inactive);
        }
    }

    #[test]
    fn test_reset_during_calibration_keeps_previous_floor() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-35.0));
        engine.start_calibration().unwrap();
        for _ in 0..10 {
            tick(&mut engine, &clock);
        }
        engine.reset();
        assert_eq!(engine.noise_floor().db(), -60.0);
        assert_eq!(engine.calibration_progress(), None);
    }

    #[test]
    fn test_noise_floor_persists_across_sessions() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-45.0));
        engine.start_calibration().unwrap();
        while engine.state() == SessionState::Calibrating {
            tick(&mut engine, &clock);
        }
        engine.start_reading().unwrap();
        tick(&mut engine, &clock);
        engine.stop();
        engine.continue_to_new_session();
        engine.reset();

        assert_eq!(engine.noise_floor().db(), -45.0);
    }

    #[test]
    fn test_illegal_actions_are_ignored() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-40.0));

        engine.stop();
        assert_eq!(engine.state(), SessionState::Idle);
        engine.continue_to_new_session();
        assert_eq!(engine.state(), SessionState::Idle);

        engine.start_reading().unwrap();
        tick(&mut engine, &clock);
        engine.start_calibration().unwrap();
        assert_eq!(engine.state(), SessionState::Reading);
        engine.start_reading().unwrap();
        assert_eq!(engine.state(), SessionState::Reading);
        engine.continue_to_new_session();
        assert_eq!(engine.state(), SessionState::Reading);
        assert_eq!(engine.stats().duration(), Duration::from_millis(100));

        engine.stop();
        engine.start_reading().unwrap();
        assert_eq!(engine.state(), SessionState::Completed);
        engine.start_calibration().unwrap();
        assert_eq!(engine.state(), SessionState::Completed);
    }

    #[test]
    fn test_start_reading_during_calibration_is_ignored() {
        let (mut engine, _) = engine_with(ScriptedSensor::constant(-40.0));
        engine.start_calibration().unwrap();
        engine.start_reading().unwrap();
        assert_eq!(engine.state(), SessionState::Calibrating);
    }

    #[test]
    fn test_paused_does_not_tick() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-40.0));
        engine.start_reading().unwrap();
        engine.timer.disarm();
        engine.state = SessionState::Paused;

        assert_eq!(tick(&mut engine, &clock), TickReport::Inactive);
        assert_eq!(engine.volume_status(), VolumeStatus::Idle);
        assert!(engine.stats().is_empty());
    }

    #[test]
    fn test_smoothed_value_tracks_but_does_not_score() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-20.0));
        engine.start_reading().unwrap();
        tick(&mut engine, &clock);

        // alpha 0.3 from the -100 floor: -100 * 0.7 + -20 * 0.3
        assert!((engine.smoothed_db() - -76.0).abs() < 1e-9);
        // Scored on the raw sample, which is above target
        assert_eq!(engine.stats().valid_duration(), Duration::from_millis(100));
    }

    #[test]
    fn test_snapshot_reflects_derived_values() {
        let (mut engine, clock) = engine_with(ScriptedSensor::constant(-40.0));
        engine.start_reading().unwrap();
        for _ in 0..25 {
            tick(&mut engine, &clock);
        }

        let snap = engine.snapshot();
        assert_eq!(snap.state, SessionState::Reading);
        assert_eq!(snap.noise_floor_db, -60.0);
        assert_eq!(snap.target_threshold_db, -50.0);
        assert_eq!(snap.scream_threshold_db, -15.0);
        assert_eq!(snap.volume_status, VolumeStatus::Good);
        assert!((snap.growth_percentage - 25.0).abs() < 1e-9);
        assert_eq!(snap.stats.trees_planted(), 0);
        assert_eq!(snap.calibration_progress, None);
        assert_eq!(snap.last_error, None);
    }

    #[test]
    fn test_drop_releases_sensor() {
        let sensor = ScriptedSensor::constant(-40.0);
        let releases = sensor.release_counter();
        let (mut engine, _) = engine_with(sensor);
        engine.start_reading().unwrap();
        assert!(engine.sensor().is_active());

        drop(engine);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn test_drop_of_idle_engine_releases_nothing() {
        let sensor = ScriptedSensor::constant(-40.0);
        let releases = sensor.release_counter();
        let (engine, _) = engine_with(sensor);

        drop(engine);
        assert_eq!(releases.get(), 0);
    }
}

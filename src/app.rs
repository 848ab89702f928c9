//! Front-end model: the engine plus the decorations that only the terminal
//! UI cares about (level history for the chart, tree celebration).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::celebration::TreeCelebration;
use crate::engine::{Engine, TickReport};
use crate::runtime::{Clock, SystemClock};
use crate::sensor::LevelSensor;
use crate::session::{SessionConfig, SessionState};
use crate::time_series::LevelHistory;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Which screen to draw; derived from the engine state, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Session,
    Results,
}

impl AppScreen {
    pub fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::Completed => AppScreen::Results,
            _ => AppScreen::Session,
        }
    }
}

pub struct App<C: Clock = SystemClock> {
    pub engine: Engine<Box<dyn LevelSensor>, C>,
    pub history: LevelHistory,
    pub celebration: TreeCelebration,
    /// Last known terminal size, used to place the celebration
    pub viewport: (u16, u16),
}

impl App<SystemClock> {
    pub fn new(sensor: Box<dyn LevelSensor>, config: SessionConfig) -> Self {
        Self::with_engine(Engine::with_system_clock(sensor, config))
    }
}

impl<C: Clock> App<C> {
    pub fn with_engine(engine: Engine<Box<dyn LevelSensor>, C>) -> Self {
        Self {
            engine,
            history: LevelHistory::new(),
            celebration: TreeCelebration::new(),
            viewport: (80, 24),
        }
    }

    pub fn screen(&self) -> AppScreen {
        AppScreen::for_state(self.engine.state())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('c') => {
                if let Err(err) = self.engine.start_calibration() {
                    debug!("calibration not started: {}", err);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let was_idle = self.engine.state() == SessionState::Idle;
                match self.engine.start_reading() {
                    Ok(()) if was_idle => self.history.clear(),
                    Ok(()) => {}
                    Err(err) => debug!("reading not started: {}", err),
                }
            }
            KeyCode::Char('s') => self.engine.stop(),
            KeyCode::Char('r') => {
                self.engine.reset();
                self.history.clear();
                self.celebration.stop();
            }
            KeyCode::Char('n') => {
                if self.engine.state() == SessionState::Completed {
                    self.engine.continue_to_new_session();
                    self.history.clear();
                    self.celebration.stop();
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    pub fn on_tick(&mut self) -> TickReport {
        let report = self.engine.on_tick();
        if let TickReport::Sampled {
            raw_db,
            tree_completed,
            ..
        } = report
        {
            self.history
                .push(self.engine.stats().duration_seconds(), raw_db);
            if tree_completed {
                let (width, height) = self.viewport;
                self.celebration.start(width, height);
            }
        }
        self.celebration.update();
        report
    }

    /// True while something on screen changes between ticks.
    pub fn needs_redraw_on_tick(&self) -> bool {
        self.engine.is_timer_armed() || self.celebration.is_active
    }
}

use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::app::{App, AppScreen};
use crate::runtime::Clock;

/// A UI Screen boundary: responsible for rendering and optional key handling
pub trait Screen<C: Clock> {
    fn render(&self, app: &App<C>, f: &mut Frame);
    /// Optional per-screen key handling. Returns true if the key was handled.
    fn on_key(&mut self, _key: KeyEvent, _app: &mut App<C>) -> bool {
        false
    }
}

/// Live meter and growing tree
pub struct SessionScreen;

impl<C: Clock> Screen<C> for SessionScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Scorecard and level chart after `stop`
pub struct ResultsScreen;

impl<C: Clock> Screen<C> for ResultsScreen {
    fn render(&self, app: &App<C>, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<C: Clock>(screen: AppScreen) -> Box<dyn Screen<C>> {
    match screen {
        AppScreen::Session => Box::new(SessionScreen),
        AppScreen::Results => Box::new(ResultsScreen),
    }
}

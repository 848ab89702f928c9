pub mod charting;
pub mod meter;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Widget, Wrap},
};

use crate::app::{App, AppScreen};
use crate::celebration::TreeCelebration;
use crate::runtime::Clock;
use crate::sensor::MIN_DECIBELS;
use crate::session::{SessionSnapshot, SessionState};
use crate::time_series::LevelHistory;
use crate::ui::charting::{chart_duration, format_label, threshold_line};
use crate::ui::meter::{
    forest_row, marker_line, meter_ratio, status_color, status_text, TreeStage,
};
use crate::util::format_duration;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const MAX_FOREST: usize = 20;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.engine.snapshot();
        match self.screen() {
            AppScreen::Session => render_session(&snapshot, area, buf),
            AppScreen::Results => render_results(&snapshot, &self.history, area, buf),
        }

        if self.celebration.is_active {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

fn legend(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle | SessionState::Paused => {
            "(c)alibrate / (enter) start reading / (r)eset / (q)uit"
        }
        SessionState::Calibrating => "(c) restart calibration / (r)eset / (q)uit",
        SessionState::Reading => "(s)top / (r)eset / (q)uit",
        SessionState::Completed => "(n)ew session / (r)eset / (q)uit",
    }
}

fn scorecard_line(snapshot: &SessionSnapshot) -> String {
    let stats = &snapshot.stats;
    format!(
        "time {}   good {}   quiet {}   loud {}   trees {}",
        format_duration(stats.duration_seconds()),
        format_duration(stats.valid_duration_seconds()),
        format_duration(stats.too_quiet_duration_seconds()),
        format_duration(stats.too_loud_duration_seconds()),
        stats.trees_planted()
    )
}

fn render_session(snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let status_style = Style::default().fg(status_color(snapshot.volume_status));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1), // title
                Constraint::Length(1), // helper
                Constraint::Length(3), // meter
                Constraint::Length(1), // meter markers
                Constraint::Length(1), // thresholds
                Constraint::Min(5),    // tree
                Constraint::Length(3), // growth
                Constraint::Length(1), // scorecard
                Constraint::Length(1), // error
                Constraint::Length(1), // legend
            ]
            .as_slice(),
        )
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled("readgrove  ", bold_style),
        Span::styled(snapshot.state.to_string(), status_style.patch(bold_style)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let helper = match snapshot.calibration_progress {
        Some(progress) => format!(
            "{} {:.0}%",
            snapshot.state.helper_text(),
            progress * 100.0
        ),
        None => snapshot.state.helper_text().to_string(),
    };
    Paragraph::new(Span::styled(helper, italic_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Level"))
        .gauge_style(status_style)
        .ratio(meter_ratio(snapshot.smoothed_db))
        .label(format!(
            "{:.1} dB  {}",
            snapshot.smoothed_db,
            status_text(snapshot.volume_status)
        ))
        .render(chunks[2], buf);

    // Markers line up with the gauge interior, inside the block border
    let marker_area = Rect {
        x: chunks[3].x.saturating_add(1),
        width: chunks[3].width.saturating_sub(2),
        ..chunks[3]
    };
    Paragraph::new(Span::styled(
        marker_line(
            marker_area.width,
            &[
                (snapshot.noise_floor_db, '^'),
                (snapshot.target_threshold_db, '|'),
                (snapshot.scream_threshold_db, '!'),
            ],
        ),
        bold_style,
    ))
    .render(marker_area, buf);

    Paragraph::new(Span::styled(
        format!(
            "^ floor {:.1} dB   | target {:.1} dB   ! too loud above {:.1} dB",
            snapshot.noise_floor_db, snapshot.target_threshold_db, snapshot.scream_threshold_db
        ),
        dim_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    let mut tree_lines: Vec<Line> = TreeStage::from_growth(snapshot.growth_percentage)
        .art()
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(Color::Green))))
        .collect();
    tree_lines.push(Line::from(Span::styled(
        forest_row(snapshot.stats.trees_planted(), MAX_FOREST),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    Paragraph::new(tree_lines)
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Growth"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((snapshot.growth_percentage / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", snapshot.growth_percentage))
        .render(chunks[6], buf);

    Paragraph::new(Span::styled(scorecard_line(snapshot), bold_style))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);

    if let Some(err) = &snapshot.last_error {
        Paragraph::new(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[8], buf);
    }

    Paragraph::new(Span::styled(legend(snapshot.state), italic_style)).render(chunks[9], buf);
}

fn render_results(
    snapshot: &SessionSnapshot,
    history: &LevelHistory,
    area: Rect,
    buf: &mut Buffer,
) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),    // chart
                Constraint::Length(1), // headline stats
                Constraint::Length(1), // scorecard
                Constraint::Length(1), // padding
                Constraint::Length(1), // legend
            ]
            .as_slice(),
        )
        .split(area);

    let coords = history.coords();
    let duration = chart_duration(&coords);
    let target = threshold_line(snapshot.target_threshold_db, duration);
    let loud = threshold_line(snapshot.scream_threshold_db, duration);
    let datasets = vec![
        Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(magenta_style)
            .graph_type(GraphType::Line)
            .data(&coords),
        Dataset::default()
            .marker(ratatui::symbols::Marker::Dot)
            .style(Style::default().fg(Color::Green))
            .graph_type(GraphType::Line)
            .data(&target),
        Dataset::default()
            .marker(ratatui::symbols::Marker::Dot)
            .style(Style::default().fg(Color::Red))
            .graph_type(GraphType::Line)
            .data(&loud),
    ];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, duration])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(format_label(duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("dB")
                .bounds([MIN_DECIBELS, 0.0])
                .labels(vec![
                    Span::styled(format_label(MIN_DECIBELS), bold_style),
                    Span::styled("0", bold_style),
                ]),
        );
    chart.render(chunks[0], buf);

    let stats = &snapshot.stats;
    let mut headline = format!(
        "{} {}   {:.0}% good",
        stats.trees_planted(),
        if stats.trees_planted() == 1 { "tree" } else { "trees" },
        stats.valid_percentage()
    );
    if let Some(summary) = history.summary() {
        headline.push_str(&format!(
            "   avg {:.1} dB   {:.1} sd",
            summary.mean_db, summary.std_dev_db
        ));
    }
    Paragraph::new(Span::styled(headline, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        scorecard_line(snapshot),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(legend(snapshot.state), italic_style)).render(chunks[4], buf);
}

/// Render celebration particles on top of the current screen
fn render_celebration_particles(celebration: &TreeCelebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Green,
        Color::LightGreen,
        Color::Yellow,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];
            let alpha = 1.0 - (particle.age / particle.max_age);

            let style = if particle.target.is_some() {
                Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD)
            } else if alpha > 0.6 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else if alpha > 0.3 {
                Style::default().fg(color)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::error::SensorAcquisitionError;
    use crate::runtime::ManualClock;
    use crate::sensor::{LevelSensor, ScriptedSensor};
    use crate::session::SessionConfig;

    fn create_test_app(sensor: ScriptedSensor) -> App<ManualClock> {
        let sensor: Box<dyn LevelSensor> = Box::new(sensor);
        App::with_engine(Engine::new(
            sensor,
            ManualClock::new(),
            SessionConfig::default(),
        ))
    }

    fn rendered(app: &App<ManualClock>, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_idle_screen_shows_legend_and_floor() {
        let app = create_test_app(ScriptedSensor::constant(-45.0));
        let content = rendered(&app, Rect::new(0, 0, 100, 30));

        assert!(content.contains("readgrove"));
        assert!(content.contains("Idle"));
        assert!(content.contains("(c)alibrate"));
        assert!(content.contains("floor -60.0 dB"));
        assert!(content.contains("target -50.0 dB"));
    }

    #[test]
    fn test_reading_screen_shows_scorecard() {
        let mut app = create_test_app(ScriptedSensor::constant(-40.0));
        app.engine.start_reading().unwrap();
        for _ in 0..20 {
            app.on_tick();
        }
        let content = rendered(&app, Rect::new(0, 0, 100, 30));

        assert!(content.contains("Reading"));
        assert!(content.contains("time 0:02"));
        assert!(content.contains("good 0:02"));
        assert!(content.contains("20%"));
    }

    #[test]
    fn test_results_screen_after_stop() {
        let mut app = create_test_app(ScriptedSensor::constant(-40.0));
        app.engine.start_reading().unwrap();
        for _ in 0..30 {
            app.on_tick();
        }
        app.engine.stop();
        let content = rendered(&app, Rect::new(0, 0, 100, 30));

        assert!(content.contains("0 trees"));
        assert!(content.contains("100% good"));
        assert!(content.contains("avg -40.0 dB"));
        assert!(content.contains("(n)ew session"));
    }

    #[test]
    fn test_error_is_rendered() {
        let mut app = create_test_app(
            ScriptedSensor::constant(-40.0).failing(SensorAcquisitionError::PermissionDenied),
        );
        assert!(app.engine.start_reading().is_err());
        let content = rendered(&app, Rect::new(0, 0, 120, 30));

        assert!(content.contains("Microphone permission denied"));
    }

    #[test]
    fn test_ui_widget_extreme_sizes() {
        let mut app = create_test_app(ScriptedSensor::constant(-40.0));

        for area in [
            Rect::new(0, 0, 10, 5),
            Rect::new(0, 0, 1000, 1000),
            Rect::new(0, 0, 80, 24),
            Rect::new(0, 0, 200, 5),
            Rect::new(0, 0, 5, 200),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }

        app.engine.start_reading().unwrap();
        app.on_tick();
        app.engine.stop();
        let area = Rect::new(0, 0, 10, 5);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn test_celebration_particles_rendering() {
        let mut app = create_test_app(ScriptedSensor::constant(-40.0));
        app.celebration.start(80, 24);

        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);

        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        let letters_visible = app
            .celebration
            .particles
            .iter()
            .filter(|p| p.target.is_some())
            .any(|p| content.contains(p.symbol));
        assert!(letters_visible);
    }

    #[test]
    fn test_legend_per_state() {
        assert!(legend(SessionState::Reading).contains("(s)top"));
        assert!(legend(SessionState::Completed).contains("(n)ew"));
        assert!(legend(SessionState::Calibrating).contains("restart"));
    }
}

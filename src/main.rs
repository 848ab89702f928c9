use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use readgrove::{
    app::{App, KeyOutcome},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner, SystemClock},
    sensor::{LevelSensor, SimulatedSensor},
    session::SessionConfig,
    ui::screen::{current_screen, Screen},
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// read aloud and grow a forest by keeping a steady, clear voice
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal read-aloud trainer. Calibrate to the room, then read aloud: every stretch of good speaking volume grows a tree, too quiet or too loud does not."
)]
pub struct Cli {
    /// milliseconds between level samples
    #[clap(long)]
    tick_ms: Option<u64>,

    /// length of the calibration window in milliseconds
    #[clap(long)]
    calibration_ms: Option<u64>,

    /// dB above the noise floor a voice must reach to count as good
    #[clap(short = 'o', long, allow_negative_numbers = true)]
    target_offset: Option<f64>,

    /// dB level above which the voice counts as too loud
    #[clap(long, allow_negative_numbers = true)]
    scream_threshold: Option<f64>,

    /// weight of the newest sample in the meter smoothing, in (0, 1]
    #[clap(long)]
    smoothing: Option<f64>,

    /// use the simulated level sensor instead of the microphone
    #[clap(long)]
    simulate: bool,

    /// seed for the simulated sensor
    #[clap(long)]
    seed: Option<u64>,

    /// config file to read (and write with --save-config)
    #[clap(long)]
    config: Option<PathBuf>,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line overrides on top of the loaded config
    fn apply(&self, cfg: &mut Config) {
        if let Some(tick_ms) = self.tick_ms {
            cfg.tick_ms = tick_ms;
        }
        if let Some(calibration_ms) = self.calibration_ms {
            cfg.calibration_ms = calibration_ms;
        }
        if let Some(offset) = self.target_offset {
            cfg.target_offset_db = offset;
        }
        if let Some(scream) = self.scream_threshold {
            cfg.scream_threshold_db = scream;
        }
        if let Some(alpha) = self.smoothing {
            cfg.smoothing_alpha = alpha;
        }
        if self.simulate {
            cfg.simulate = true;
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn build_sensor(simulate: bool, seed: Option<u64>) -> Box<dyn LevelSensor> {
    #[cfg(feature = "microphone")]
    {
        if !simulate {
            return Box::new(readgrove::sensor::MicrophoneSensor::new());
        }
    }
    #[cfg(not(feature = "microphone"))]
    if !simulate {
        warn!("built without the microphone feature, using the simulated sensor");
    }

    match seed {
        Some(seed) => Box::new(SimulatedSensor::seeded(seed)),
        None => Box::new(SimulatedSensor::new()),
    }
}

/// Logs go to a file; the terminal belongs to the TUI.
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false),
        )
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let store = cli.config_store();
    let mut config = store.load();
    cli.apply(&mut config);
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let sensor = build_sensor(config.simulate, cli.seed);
    let mut app = App::new(sensor, SessionConfig::from(&config));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let ticker = FixedTicker::new(app.engine.config().tick_period());
    let runner = Runner::new(CrosstermEventSource::new(), ticker);

    let size = terminal.size()?;
    app.viewport = (size.width, size.height);
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                let was_live = app.needs_redraw_on_tick();
                app.on_tick();
                if was_live || app.needs_redraw_on_tick() {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                let size = terminal.size()?;
                app.viewport = (size.width, size.height);
                terminal.draw(|f| ui(app, f))?;
            }
            AppEvent::Key(key) => {
                if app.handle_key(key) == KeyOutcome::Quit {
                    break;
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    let screen: Box<dyn Screen<SystemClock>> = current_screen(app.screen());
    screen.render(app, f);
}

// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod calibration;
pub mod celebration;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod runtime;
pub mod sensor;
pub mod session;
pub mod smoothing;
pub mod stats;
pub mod time_series;
pub mod ui;
pub mod util;

pub use engine::{Engine, TickReport};
pub use error::SensorAcquisitionError;
pub use session::{SessionConfig, SessionSnapshot, SessionState};

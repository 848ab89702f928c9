// Errors surfaced by the session engine.
//
// Acquiring the level sensor is the only fallible operation in the engine.
// Failures are reported at the action boundary (start_calibration /
// start_reading) and never reach the tick loop.

use std::fmt;
use tracing::warn;

/// Numeric code plus human-readable message, for display in the status line
/// and for structured log fields.
pub trait ErrorCode {
    fn code(&self) -> i32;

    fn message(&self) -> String;
}

/// Log a sensor acquisition failure with structured context.
pub fn log_sensor_error(err: &SensorAcquisitionError, context: &str) {
    warn!(
        code = err.code(),
        component = "LevelSensor",
        context,
        "sensor acquisition failed: {}",
        err.message()
    );
}

/// Failure to open the level sensor (microphone).
///
/// Error code range: 1001-1003
#[derive(Debug, Clone, PartialEq)]
pub enum SensorAcquisitionError {
    /// The user or the OS refused microphone access
    PermissionDenied,

    /// No capture backend exists in this environment
    Unsupported { reason: String },

    /// A backend exists but the device could not be opened
    DeviceUnavailable { details: String },
}

impl ErrorCode for SensorAcquisitionError {
    fn code(&self) -> i32 {
        match self {
            SensorAcquisitionError::PermissionDenied => 1001,
            SensorAcquisitionError::Unsupported { .. } => 1002,
            SensorAcquisitionError::DeviceUnavailable { .. } => 1003,
        }
    }

    fn message(&self) -> String {
        match self {
            SensorAcquisitionError::PermissionDenied => "Microphone permission denied".to_string(),
            SensorAcquisitionError::Unsupported { reason } => {
                format!("Microphone capture not supported: {}", reason)
            }
            SensorAcquisitionError::DeviceUnavailable { details } => {
                format!("Microphone unavailable: {}", details)
            }
        }
    }
}

impl fmt::Display for SensorAcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message(), self.code())
    }
}

impl std::error::Error for SensorAcquisitionError {}

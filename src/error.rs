// ============================================================================
// ERROR TYPES
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the emotion curve crate.
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("expected 24 amplitudes, got {0}")]
    SeriesLength(usize),

    #[error("hour {0} is outside 0..24")]
    HourOutOfRange(usize),

    #[error("amplitude {value} for hour {hour} is not finite")]
    NonFiniteAmplitude { hour: usize, value: f64 },

    #[error("invalid amplitude list: {0}")]
    InvalidAmplitudes(String),

    #[error("failed to read font {}: {source}", .path.display())]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font {} could not be parsed", .0.display())]
    FontParse(PathBuf),

    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, CurveError>;

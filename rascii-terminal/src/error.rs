//! Error types for the terminal front-end.

use thiserror::Error;

/// Anything that can stop the terminal application
#[derive(Error, Debug)]
pub enum AppError {
    /// Rendering core rejected the configuration or scene
    #[error(transparent)]
    Render(#[from] rascii_core::Error),

    /// Terminal or file I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid RON for [`crate::config::AppConfig`]
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Config could not be written as RON
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Application settings outside the accepted range
    #[error("Invalid config: {0}")]
    Config(String),

    /// Surface and display disagree on the frame size
    #[error("Surface is {surface_width}x{surface_height} but display expects {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        surface_width: usize,
        surface_height: usize,
    },
}

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

//! Error types
//!
//! Library-level errors for the kiosk. The CLI and TUI layers wrap these in
//! `anyhow` with context; the capture flow turns them into user-facing
//! messages.

use thiserror::Error;

/// Coarse classification of a [`MoodRxError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Validation,
    Transport,
    Server,
    Decode,
    Camera,
    Io,
}

#[derive(Debug, Error)]
pub enum MoodRxError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("camera error: {0}")]
    Camera(String),

    #[error(transparent)]
    Analysis(#[from] crate::analysis::AnalysisError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MoodRxError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::InvalidDataUrl(_) => ErrorCode::Decode,
            Self::Camera(_) => ErrorCode::Camera,
            Self::Analysis(e) => e.code(),
            Self::Io(_) => ErrorCode::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, MoodRxError>;

// Error handling module
// Contains custom error types and error handling utilities

use thiserror::Error;

// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("No audio file selected")]
    NothingSelected,
}

// Реализация трейтов From для различных типов ошибок
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ApiError(err.to_string())
    }
}

// Result type alias for application
pub type AppResult<T> = Result<T, AppError>;

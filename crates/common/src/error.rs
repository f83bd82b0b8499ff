//! Error types shared across Peeper crates.
//!
//! None of these ever cross the widget boundary: the widget engine logs
//! them and degrades instead.

/// Top-level error type for Peeper operations.
#[derive(Debug, thiserror::Error)]
pub enum PeeperError {
    #[error("Measurement error: {message}")]
    Measurement { message: String },

    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Scenario error: {message}")]
    Script { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PeeperError.
pub type PeeperResult<T> = Result<T, PeeperError>;

impl PeeperError {
    pub fn measurement(msg: impl Into<String>) -> Self {
        Self::Measurement {
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script {
            message: msg.into(),
        }
    }
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Not found")]
    NotFound,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid time range: {start} - {end}")]
    Duration { start: String, end: String },
}

impl AppError {
    /// Text for the notification sink. Backend payload messages win over
    /// the caller's generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Api {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            AppError::NotFound => "Schedule not found".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::NotFound => true,
            AppError::Api { status, .. } => *status == StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}

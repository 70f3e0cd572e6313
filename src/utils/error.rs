use crate::core::failure::GenerationFailure;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("{message}")]
    Conflict { message: String },

    #[error(transparent)]
    GenerationError(#[from] GenerationFailure),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Password hashing failed: {message}")]
    PasswordHashError { message: String },

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            // 重複 email 沿用 400，前端依 message 顯示
            Self::ValidationError { .. } | Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } | Self::TokenError(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::GenerationError(failure) => failure.status_code(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 回傳給呼叫端的訊息；內部錯誤不外洩細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { .. }
            | Self::Unauthorized { .. }
            | Self::NotFound { .. }
            | Self::Conflict { .. }
            | Self::GenerationError(_) => self.to_string(),
            Self::TokenError(_) => "Not authorized, token failed".to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingConfigError { .. } => {
                "Set the missing value via its command-line flag or environment variable"
            }
            Self::InvalidConfigValueError { .. } | Self::ConfigError { .. } => {
                "Check the configuration file and environment variables"
            }
            Self::IoError(_) => "Check file paths and permissions",
            Self::HttpClientError(_) => "Check network connectivity and TLS settings",
            _ => "Retry the request; contact support if the problem persists",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("❌ Request failed ({}): {}", status.as_u16(), self);
        }

        let body = match &self {
            Self::GenerationError(failure) => serde_json::json!({
                "message": failure.message,
                "category": failure.category,
            }),
            _ => serde_json::json!({ "message": self.user_friendly_message() }),
        };

        (status, Json(body)).into_response()
    }
}

/// JSON 格式錯誤、欄位型別不符或缺少 Content-Type 一律視為 400
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

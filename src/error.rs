//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("File too large")]
    FileTooLarge,

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No token provided")]
    NoToken,

    #[error("Malformed authorization header")]
    MalformedAuthHeader,

    #[error("Empty bearer token")]
    EmptyToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Email already exists")]
    EmailTaken,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 将 validator 的字段级错误聚合为一条验证错误
    pub fn validation(errors: &validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = Vec::new();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let detail = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                messages.push(format!("{}: {}", field, detail));
            }
        }

        messages.sort();
        AppError::Validation(messages.join("; "))
    }

    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::FileTooLarge
            | AppError::InvalidFileType
            | AppError::EmailTaken => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::NoToken
            | AppError::MalformedAuthHeader
            | AppError::EmptyToken
            | AppError::TokenExpired
            | AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取业务错误码（响应体中的 errorCode 字段）
    pub fn error_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 4001,
            AppError::FileTooLarge => 4002,
            AppError::InvalidFileType => 4003,
            AppError::InvalidCredentials => 4010,
            AppError::NoToken => 4011,
            AppError::MalformedAuthHeader => 4012,
            AppError::EmptyToken => 4013,
            AppError::TokenExpired => 4014,
            AppError::TokenInvalid => 4015,
            AppError::NotFound(_) => 4041,
            AppError::EmailTaken | AppError::Conflict(_) => 4091,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => 5001,
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::FileTooLarge => "File too large".to_string(),
            AppError::InvalidFileType => {
                "Invalid file type. Only JPG, JPEG, PNG allowed.".to_string()
            }
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::NoToken => "Access denied. No token provided.".to_string(),
            AppError::MalformedAuthHeader => {
                "Access denied. Invalid token format. Use Bearer <token>".to_string()
            }
            AppError::EmptyToken => "Access denied. Token is empty.".to_string(),
            AppError::TokenExpired => "Access denied. Token has expired.".to_string(),
            AppError::TokenInvalid => "Access denied. Invalid token.".to_string(),
            AppError::EmailTaken => "Email already exists".to_string(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound(what) => format!("{} not found", what),
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                "Internal server error. Please try again later.".to_string()
            }
        }
    }
}

/// 错误响应 DTO（统一信封：success/message/errorCode）
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "errorCode")]
    pub error_code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = ErrorResponse {
            success: false,
            message: self.user_message(),
            error_code: self.error_code(),
        };

        // 服务端日志保留完整错误细节，响应体不泄露
        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error_code = error_response.error_code,
                detail = %self,
                "Application error"
            );
        } else {
            tracing::debug!(
                status = status.as_u16(),
                error_code = error_response.error_code,
                detail = %self,
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

/// 从 String 转换为 AppError::Internal
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Internal(s)
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidationError;

/// 用户角色常量
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_ADMIN: &str = "admin";

/// User entity
///
/// `verification_token` is present only while the user is unverified and the
/// token has not been consumed; it is cleared on successful verification.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Register request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Fullname is required"))]
    pub fullname: String,
    pub username: Option<String>,
    #[validate(email(message = "Valid email required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password min 6 characters"))]
    pub password: String,
    #[validate(custom(function = validate_role))]
    pub role: Option<String>,
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    match role {
        ROLE_STUDENT | ROLE_ADMIN => Ok(()),
        _ => Err(ValidationError::new("role").with_message("Role must be student or admin".into())),
    }
}

/// Login request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password required"))]
    pub password: String,
}

/// 注册成功响应数据
///
/// 邮件投递失败时注册仍然成功，verificationToken 暴露给调用方用于
/// 手动补发或测试（沿用原始行为）。
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    #[serde(rename = "verificationToken")]
    pub verification_token: Option<String>,
}

/// 登录成功响应数据
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// User response (never exposes the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.full_name,
            email: user.email,
            is_verified: user.is_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            fullname: "Jane Doe".to_string(),
            username: None,
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
            role: Some(ROLE_STUDENT.to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_aggregates_field_errors() {
        let req = RegisterRequest {
            fullname: String::new(),
            username: None,
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            role: None,
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("fullname"));
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let req = RegisterRequest {
            fullname: "Jane Doe".to_string(),
            username: None,
            email: "jane@example.com".to_string(),
            password: "secret1".to_string(),
            role: Some("teacher".to_string()),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_password() {
        let req = LoginRequest {
            email: "jane@example.com".to_string(),
            password: String::new(),
        };
        assert!(req.validate().is_err());
    }
}

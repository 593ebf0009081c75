//! 认证相关的 HTTP 处理器

use crate::{error::AppError, middleware::AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::models::user::{LoginRequest, RegisterRequest};
use crate::services::auth_service::VerifyOutcome;

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|e| AppError::validation(&e))?;

    let data = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User registered successfully. Please check your email for verification.",
            "data": data
        })),
    ))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|e| AppError::validation(&e))?;

    let data = state.auth_service.login(req).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "data": data
    })))
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

/// 邮箱验证（浏览器落地页，返回 HTML 而不是 JSON 信封）
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VerifyEmailQuery>,
) -> Response {
    match state.auth_service.verify_email(query.token.as_deref()).await {
        Ok(VerifyOutcome::Verified { email }) => (
            StatusCode::OK,
            Html(render_page(
                "Email Verified Successfully",
                "🎉",
                "Email Verified Successfully!",
                &format!(
                    "Congratulations! Your email address <strong>{}</strong> has been verified and your account is now active.",
                    email
                ),
            )),
        )
            .into_response(),
        Ok(VerifyOutcome::AlreadyVerified { email }) => (
            StatusCode::OK,
            Html(render_page(
                "Already Verified",
                "✅",
                "Already Verified!",
                &format!(
                    "Your email <strong>{}</strong> has already been verified. You can now login to your account.",
                    email
                ),
            )),
        )
            .into_response(),
        Err(AppError::Validation(_)) => (
            StatusCode::BAD_REQUEST,
            Html(render_page(
                "Verification Failed",
                "❌",
                "Verification Failed",
                "Verification token is required. Please check your email and click the verification link again.",
            )),
        )
            .into_response(),
        Err(AppError::TokenInvalid) => (
            StatusCode::BAD_REQUEST,
            Html(render_page(
                "Invalid Token",
                "🔗",
                "Invalid Verification Token",
                "The verification link is invalid or has expired. Please request a new verification email.",
            )),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Email verification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(
                    "Server Error",
                    "⚠️",
                    "Server Error",
                    "Something went wrong while verifying your email. Please try again later or contact support.",
                )),
            )
                .into_response()
        }
    }
}

/// 简单的结果落地页
fn render_page(title: &str, icon: &str, heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
    body {{
      font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      margin: 0;
      min-height: 100vh;
      display: flex;
      align-items: center;
      justify-content: center;
    }}
    .container {{
      background: white;
      padding: 40px;
      border-radius: 15px;
      box-shadow: 0 20px 40px rgba(0,0,0,0.1);
      text-align: center;
      max-width: 500px;
      width: 90%;
    }}
    .icon {{ font-size: 64px; margin-bottom: 20px; }}
    h1 {{ color: #2c3e50; margin-bottom: 20px; font-size: 28px; }}
    p {{ color: #7f8c8d; font-size: 16px; line-height: 1.6; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="icon">{icon}</div>
    <h1>{heading}</h1>
    <p>{body}</p>
  </div>
</body>
</html>"#
    )
}

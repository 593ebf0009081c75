//! JWT 认证中间件

use crate::{auth::jwt::JwtService, error::AppError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::NoToken)
    }
}

/// 从 Authorization 头提取令牌
///
/// 区分三种拒绝情形：没有头、前缀不是 Bearer、前缀后为空。
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::NoToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AppError::MalformedAuthHeader)?;

    if token.trim().is_empty() {
        return Err(AppError::EmptyToken);
    }

    Ok(token.to_string())
}

/// JWT 认证中间件 - 必须认证
///
/// 纯令牌校验，不访问用户存储：已删除的用户在令牌过期前仍被视为已认证，
/// 这是有意的设计取舍。
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 从 Authorization 头提取令牌
    let token = extract_token(req.headers())?;

    // 验证令牌
    let claims = jwt_service.verify(&token)?;

    // 创建认证上下文
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::TokenInvalid)?;
    let auth_context = AuthContext {
        user_id,
        email: claims.email,
        full_name: claims.full_name,
    };

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

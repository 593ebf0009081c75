//! 认证中间件集成测试
//! 不依赖数据库，直接用最小路由验证令牌校验行为

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use learnhub::auth::{jwt::Claims, jwt_auth_middleware, AuthContext, JwtService};

mod common;

/// 受保护的测试处理器，回显认证上下文
async fn whoami(ctx: AuthContext) -> Json<serde_json::Value> {
    Json(json!({
        "userId": ctx.user_id,
        "email": ctx.email,
        "fullName": ctx.full_name,
    }))
}

fn test_app() -> (Router, Arc<JwtService>) {
    let config = common::create_test_config();
    let jwt_service =
        Arc::new(JwtService::from_config(&config).expect("Failed to create JWT service"));

    let app = Router::new()
        .route("/protected", get(whoami))
        .layer(from_fn_with_state(jwt_service.clone(), jwt_auth_middleware));

    (app, jwt_service)
}

async fn error_code(response: axum::response::Response) -> (StatusCode, i64) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    (status, body["errorCode"].as_i64().unwrap())
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, code) = error_code(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code, 4011);
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, code) = error_code(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code, 4012);
}

#[tokio::test]
async fn test_empty_bearer_token() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header(header::AUTHORIZATION, "Bearer    ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, code) = error_code(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code, 4013);
}

#[tokio::test]
async fn test_expired_token() {
    let (app, _) = test_app();
    let config = common::create_test_config();

    // 手工签发一个过期令牌（留出 jsonwebtoken 默认 60 秒余量）
    use jsonwebtoken::{encode, EncodingKey, Header};
    use secrecy::ExposeSecret;

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "expired@example.com".to_string(),
        full_name: "Expired User".to_string(),
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.security.jwt_secret.expose_secret().as_bytes()),
    )
    .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, code) = error_code(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code, 4014);
}

#[tokio::test]
async fn test_tampered_token() {
    let (app, jwt_service) = test_app();

    let token = jwt_service
        .issue(&Uuid::new_v4(), "user@example.com", "Test User")
        .unwrap();

    // 破坏签名部分
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'a' { 'b' } else { 'a' });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header(header::AUTHORIZATION, format!("Bearer {}", tampered))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, code) = error_code(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(code, 4015);
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let (app, jwt_service) = test_app();

    let user_id = Uuid::new_v4();
    let token = jwt_service
        .issue(&user_id, "user@example.com", "Test User")
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/protected")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["userId"], user_id.to_string());
    assert_eq!(body["email"], "user@example.com");
    assert_eq!(body["fullName"], "Test User");
}

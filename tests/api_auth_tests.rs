//! 认证 API 集成测试
//! 需要 PostgreSQL，默认忽略；设置 TEST_DATABASE_URL 后用 --ignored 运行

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{
    create_test_app_state, create_test_user, create_verified_user_with_token, setup_test_db,
};

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_register_success() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = learnhub::routes::create_router(state);

    let request_body = json!({
        "fullname": "Jane Doe",
        "email": "jane@example.com",
        "password": "secret123"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], "jane@example.com");
    assert!(json["data"]["verificationToken"].is_string());
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_register_ignores_requested_role() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool.clone()).await;
    let app = learnhub::routes::create_router(state);

    // 注册入口是匿名的：请求中的 role 通过格式校验，但不得影响落库角色
    let request_body = json!({
        "fullname": "Eve Mallory",
        "email": "eve@example.com",
        "password": "secret123",
        "role": "admin"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let stored_role: String =
        sqlx::query_scalar("SELECT role FROM users WHERE email = 'eve@example.com'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored_role, "student");
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_register_duplicate_email() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "Jane Doe", "jane@example.com", "secret123", true)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = learnhub::routes::create_router(state);

    let request_body = json!({
        "fullname": "Jane Again",
        "email": "jane@example.com",
        "password": "secret123"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["errorCode"], 4091);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_register_invalid_payload() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = learnhub::routes::create_router(state);

    // 密码过短、邮箱格式错误
    let request_body = json!({
        "fullname": "",
        "email": "not-an-email",
        "password": "123"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["errorCode"], 4001);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_login_success() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "Jane Doe", "jane@example.com", "secret123", true)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = learnhub::routes::create_router(state);

    let request_body = json!({
        "email": "jane@example.com",
        "password": "secret123"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["user"]["email"], "jane@example.com");
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_login_wrong_password() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    create_test_user(&pool, "Jane Doe", "jane@example.com", "secret123", true)
        .await
        .expect("Failed to create test user");

    let state = create_test_app_state(pool).await;
    let app = learnhub::routes::create_router(state);

    let request_body = json!({
        "email": "jane@example.com",
        "password": "wrong-password"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = json_body(response).await;
    assert_eq!(json["errorCode"], 4010);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_login_unknown_email() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = learnhub::routes::create_router(state);

    let request_body = json!({
        "email": "nobody@example.com",
        "password": "secret123"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["errorCode"], 4041);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_verify_email_already_verified_is_idempotent() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    // 已验证用户带着未消费的令牌：重复验证是幂等的成功，不是错误
    let (_, token) =
        create_verified_user_with_token(&pool, "Jane Doe", "jane@example.com", "secret123")
            .await
            .expect("Failed to create verified test user");

    let state = create_test_app_state(pool).await;
    let app = learnhub::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/auth/verify-email?token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Already Verified"));
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_verify_email_flow() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool.clone()).await;
    let app = learnhub::routes::create_router(state);

    // 注册后取回验证令牌
    let request_body = json!({
        "fullname": "Jane Doe",
        "email": "jane@example.com",
        "password": "secret123"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let json = json_body(response).await;
    let token = json["data"]["verificationToken"].as_str().unwrap().to_string();

    // 第一次验证成功
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/auth/verify-email?token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Email Verified Successfully"));

    // 令牌已清除，重复使用视为无效
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/auth/verify-email?token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 缺少令牌
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/verify-email")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

//! 路由配置
//! 组装公开路由、认证路由与受保护路由

use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    auth::jwt_auth_middleware,
    handlers::{auth, course, health, upload},
    middleware::{request_tracking_middleware, AppState},
};

/// multipart 自身的编码开销，留给请求体限制的余量
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开路由 - 探针与认证入口，无需令牌
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify-email", get(auth::verify_email));

    // 受保护路由 - 需要 Bearer 令牌
    let max_body = state.config.upload.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES;
    let protected_routes = Router::new()
        .route("/api/data", get(course::list_data).post(course::create_data))
        .route(
            "/api/data/{id}",
            get(course::get_data)
                .patch(course::update_data)
                .delete(course::delete_data),
        )
        .route("/courses", get(course::list_courses))
        .route(
            "/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(max_body as usize)),
        )
        .layer(from_fn_with_state(
            state.jwt_service.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service(
            "/uploads",
            ServeDir::new(&state.config.upload.dir),
        )
        .layer(from_fn(request_tracking_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

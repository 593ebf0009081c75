//! 课程管理的 HTTP 处理器
//! /api/data 下的 CRUD 与 /courses 分页列表

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::course::{CourseListQuery, CreateCourseRequest, Pagination, UpdateCourseRequest},
    repository::CourseRepository,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 分页课程列表
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CourseRepository::new(state.db.clone());
    let (courses, total_items) = repo.list(&query).await?;

    let pagination = Pagination::new(query.page(), query.limit(), total_items);

    Ok(Json(json!({
        "success": true,
        "message": "Courses retrieved successfully",
        "data": {
            "courses": courses,
            "pagination": pagination
        }
    })))
}

/// 获取全部课程（默认按创建时间倒序）
pub async fn list_data(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CourseRepository::new(state.db.clone());
    let query = CourseListQuery {
        limit: Some(u32::MAX),
        ..Default::default()
    };
    let (courses, _) = repo.list(&query).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Data retrieved successfully",
        "data": courses
    })))
}

/// 按 ID 获取课程
pub async fn get_data(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CourseRepository::new(state.db.clone());
    let course = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Data".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Data retrieved successfully",
        "data": course
    })))
}

/// 创建课程
pub async fn create_data(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|e| AppError::validation(&e))?;

    let repo = CourseRepository::new(state.db.clone());
    let course = repo.create(&req).await?;

    tracing::info!(course_id = %course.id, created_by = %auth_context.user_id, "Course created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Data created successfully",
            "data": course
        })),
    ))
}

/// 更新课程；ID 不存在返回 404（区别于验证失败的 400）
pub async fn update_data(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(|e| AppError::validation(&e))?;

    let repo = CourseRepository::new(state.db.clone());
    let course = repo
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound("Data".to_string()))?;

    tracing::info!(course_id = %course.id, updated_by = %auth_context.user_id, "Course updated");

    Ok(Json(json!({
        "success": true,
        "message": "Data updated successfully",
        "data": course
    })))
}

/// 删除课程
pub async fn delete_data(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = CourseRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;

    if !deleted {
        return Err(AppError::NotFound("Data".to_string()));
    }

    tracing::info!(course_id = %id, deleted_by = %auth_context.user_id, "Course deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Data deleted successfully",
        "data": null
    })))
}

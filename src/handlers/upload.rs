//! 图片上传处理器
//! multipart 表单上传，文件落盘后返回可访问 URL

use crate::{
    auth::{middleware::AuthContext, verification::VerificationTokenGenerator},
    error::AppError,
    middleware::AppState,
};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// 允许的图片类型
const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// 上传图片
///
/// 只接受 jpeg/jpg/png，大小受 upload.max_file_size_bytes 限制。
/// 文件名服务端生成，保留原始扩展名。
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_size = state.config.upload.max_file_size_bytes as usize;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .ok_or(AppError::InvalidFileType)?;

        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::InvalidFileType);
        }

        let extension = field
            .file_name()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| default_extension(&content_type).to_string());

        let data = field.bytes().await.map_err(map_multipart_error)?;

        if data.len() > max_size {
            return Err(AppError::FileTooLarge);
        }

        let file_name = format!("{}.{}", VerificationTokenGenerator::generate(), extension);
        let dir = Path::new(&state.config.upload.dir);

        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create upload directory");
            AppError::Internal(format!("Failed to create upload directory: {}", e))
        })?;

        let path = dir.join(&file_name);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist uploaded file");
            AppError::Internal(format!("Failed to persist uploaded file: {}", e))
        })?;

        let url = format!(
            "{}/uploads/{}",
            state.config.server.public_url.trim_end_matches('/'),
            file_name
        );

        tracing::info!(
            file = %file_name,
            size = data.len(),
            uploaded_by = %auth_context.user_id,
            "File uploaded"
        );

        return Ok(Json(json!({
            "success": true,
            "message": "File uploaded successfully",
            "data": { "url": url }
        })));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// multipart 读取错误映射：超限走 4002，其余按请求格式错误处理
fn map_multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge
    } else {
        AppError::Validation(format!("Malformed multipart request: {}", e.body_text()))
    }
}

/// 根据内容类型推断扩展名
fn default_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_content_types() {
        assert!(ALLOWED_CONTENT_TYPES.contains(&"image/jpeg"));
        assert!(ALLOWED_CONTENT_TYPES.contains(&"image/png"));
        assert!(!ALLOWED_CONTENT_TYPES.contains(&"image/gif"));
        assert!(!ALLOWED_CONTENT_TYPES.contains(&"application/pdf"));
    }

    #[test]
    fn test_default_extension() {
        assert_eq!(default_extension("image/png"), "png");
        assert_eq!(default_extension("image/jpeg"), "jpg");
        assert_eq!(default_extension("image/jpg"), "jpg");
    }
}

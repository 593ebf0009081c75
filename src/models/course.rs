//! Course domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Course entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,
    pub category_id: i64,
    pub tutor_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration: Option<i32>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create course request
#[derive(Debug, Deserialize, validator::Validate)]
pub struct CreateCourseRequest {
    pub category_id: i64,
    pub tutor_id: i64,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: f64,
    pub duration: Option<i32>,
    pub image: Option<String>,
}

/// Update course request
///
/// 与创建请求字段要求一致：categoryId/tutorId/title/price 必填。
#[derive(Debug, Deserialize, validator::Validate)]
pub struct UpdateCourseRequest {
    pub category_id: i64,
    pub tutor_id: i64,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: f64,
    pub duration: Option<i32>,
    pub image: Option<String>,
}

/// 课程列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct CourseListQuery {
    pub category: Option<i64>,
    pub search: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CourseListQuery {
    /// 页码，最小为 1
    pub fn page(&self) -> i64 {
        i64::from(self.page.unwrap_or(1).max(1))
    }

    /// 每页条数，最小为 1
    pub fn limit(&self) -> i64 {
        i64::from(self.limit.unwrap_or(10).max(1))
    }

    /// 偏移量：skip = (page - 1) * limit
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }

    /// 排序列白名单，未知列回退到 created_at
    pub fn sort_column(&self) -> &'static str {
        match self.sort_by.as_deref() {
            Some("title") => "title",
            Some("price") => "price",
            Some("duration") => "duration",
            Some("createdAt") | Some("created_at") | None => "created_at",
            Some(_) => "created_at",
        }
    }

    /// 排序方向，默认倒序（最新优先）
    pub fn sort_direction(&self) -> &'static str {
        match self.order.as_deref() {
            Some("asc") | Some("ASC") => "ASC",
            _ => "DESC",
        }
    }
}

/// 分页信息
#[derive(Debug, Serialize)]
pub struct Pagination {
    #[serde(rename = "currentPage")]
    pub current_page: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    #[serde(rename = "totalItems")]
    pub total_items: i64,
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: i64,
}

impl Pagination {
    pub fn new(current_page: i64, items_per_page: i64, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + items_per_page - 1) / items_per_page
        };

        Self {
            current_page,
            total_pages,
            total_items,
            items_per_page,
        }
    }
}

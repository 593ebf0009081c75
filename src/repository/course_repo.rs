//! Course repository (课程数据访问)

use crate::{
    error::AppError,
    models::course::{Course, CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

pub struct CourseRepository {
    db: PgPool,
}

impl CourseRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 过滤 + 排序 + 分页查询课程，同时返回总条数
    ///
    /// category 为精确匹配，search 为标题或描述的子串匹配（ILIKE）。
    /// 排序列经过白名单校验，未知列回退到 created_at DESC。
    pub async fn list(&self, query: &CourseListQuery) -> Result<(Vec<Course>, i64), AppError> {
        let total = self.count(query).await?;

        let mut builder = QueryBuilder::new("SELECT * FROM courses WHERE 1=1");
        Self::push_filters(&mut builder, query);

        builder.push(format!(
            " ORDER BY {} {}",
            query.sort_column(),
            query.sort_direction()
        ));
        builder.push(" LIMIT ");
        builder.push_bind(query.limit());
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let courses = builder
            .build_query_as::<Course>()
            .fetch_all(&self.db)
            .await?;

        Ok((courses, total))
    }

    /// 统计匹配过滤条件的课程总数
    async fn count(&self, query: &CourseListQuery) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM courses WHERE 1=1");
        Self::push_filters(&mut builder, query);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.db)
            .await?;

        Ok(total)
    }

    fn push_filters<'a>(
        builder: &mut QueryBuilder<'a, sqlx::Postgres>,
        query: &'a CourseListQuery,
    ) {
        if let Some(category) = query.category {
            builder.push(" AND category_id = ");
            builder.push_bind(category);
        }

        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search);
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }

    /// 根据 ID 查找课程
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(course)
    }

    /// 创建课程
    pub async fn create(&self, req: &CreateCourseRequest) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (category_id, tutor_id, title, description, price, duration, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(req.category_id)
        .bind(req.tutor_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.duration)
        .bind(&req.image)
        .fetch_one(&self.db)
        .await?;

        Ok(course)
    }

    /// 更新课程；ID 不存在时返回 None（不是错误）
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateCourseRequest,
    ) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET
                category_id = $2,
                tutor_id = $3,
                title = $4,
                description = $5,
                price = $6,
                duration = $7,
                image = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(req.category_id)
        .bind(req.tutor_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.price)
        .bind(req.duration)
        .bind(&req.image)
        .fetch_optional(&self.db)
        .await?;

        Ok(course)
    }

    /// 删除课程；返回是否真的删除了一行
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

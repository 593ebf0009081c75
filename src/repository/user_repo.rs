//! User repository (数据库访问层)

use crate::{error::AppError, models::user::User};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1"
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 根据验证令牌查找用户
    pub async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE verification_token = $1"
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 创建用户（初始未验证）
    ///
    /// 邮箱唯一约束由数据库保证：并发注册同一邮箱时，后到的插入
    /// 以唯一约束冲突形式返回。
    pub async fn create(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
        verification_token: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, email, password_hash, role, verification_token)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(verification_token)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Email already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

        Ok(user)
    }

    /// 标记邮箱已验证并清除验证令牌
    pub async fn mark_verified(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                is_verified = TRUE,
                verification_token = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}

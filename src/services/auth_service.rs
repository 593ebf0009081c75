//! 认证服务：注册、登录、邮箱验证
//!
//! 用户状态机：未注册 -> 已注册（未验证）-> 已验证。
//! 验证令牌只在未验证状态下存在，验证成功后清除。

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher, verification::VerificationTokenGenerator},
    config::AppConfig,
    error::AppError,
    models::user::{
        LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserResponse, ROLE_STUDENT,
    },
    repository::user_repo::UserRepository,
    services::mail::{self, EmailSender},
};
use sqlx::PgPool;
use std::sync::Arc;

/// 邮箱验证的两种成功结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// 本次调用完成了验证
    Verified { email: String },
    /// 用户此前已验证，重复调用是幂等的成功
    AlreadyVerified { email: String },
}

pub struct AuthService {
    db: PgPool,
    jwt_service: Arc<JwtService>,
    mailer: Arc<dyn EmailSender>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(
        db: PgPool,
        jwt_service: Arc<JwtService>,
        mailer: Arc<dyn EmailSender>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            jwt_service,
            mailer,
            config,
        }
    }

    /// 用户注册
    ///
    /// 创建用户与发送验证邮件不是原子操作：邮件投递失败只记录日志，
    /// 注册仍然成功，令牌保留在响应中供手动补发。
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AppError> {
        // 配置化的密码最小长度（DTO 校验只保证固定下限）
        if (req.password.len() as u64) < self.config.security.password_min_length {
            return Err(AppError::Validation(format!(
                "password: Password min {} characters",
                self.config.security.password_min_length
            )));
        }

        let user_repo = UserRepository::new(self.db.clone());

        // 预检查重复邮箱；并发竞争情况由唯一约束兜底（409）
        if user_repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let hasher = PasswordHasher::new();
        let password_hash = hasher.hash(&req.password)?;
        let verification_token = VerificationTokenGenerator::generate();

        // 请求中的 role 只做格式校验，不参与授权：注册入口是匿名的，
        // 新用户一律以 student 身份落库
        let user = user_repo
            .create(
                &req.fullname,
                &req.email,
                &password_hash,
                ROLE_STUDENT,
                &verification_token,
            )
            .await?;

        // 尽力而为的邮件投递
        let message = mail::verification_email(&self.config, &user.email, &verification_token);
        if let Err(e) = self.mailer.send(&message) {
            tracing::warn!(
                user_id = %user.id,
                email = %user.email,
                error = %e,
                "Verification email dispatch failed, registration still succeeds"
            );
        }

        tracing::info!(user_id = %user.id, "User registered");

        Ok(RegisterResponse {
            id: user.id,
            fullname: user.full_name,
            email: user.email,
            verification_token: user.verification_token,
        })
    }

    /// 用户登录
    ///
    /// 验证状态只随响应返回，不作为登录门槛。
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let hasher = PasswordHasher::new();
        if !hasher.verify(&req.password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .jwt_service
            .issue(&user.id, &user.email, &user.full_name)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    /// 邮箱验证（对已验证用户幂等）
    pub async fn verify_email(&self, token: Option<&str>) -> Result<VerifyOutcome, AppError> {
        let token = match token {
            Some(t) if !t.trim().is_empty() => t,
            _ => {
                return Err(AppError::Validation(
                    "Verification token is required".to_string(),
                ))
            }
        };

        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_verification_token(token)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        if user.is_verified {
            return Ok(VerifyOutcome::AlreadyVerified { email: user.email });
        }

        let verified = user_repo
            .mark_verified(user.id)
            .await?
            .ok_or(AppError::TokenInvalid)?;

        tracing::info!(user_id = %verified.id, "Email verified");

        Ok(VerifyOutcome::Verified {
            email: verified.email,
        })
    }
}

//! Email delivery abstraction.
//!
//! The SMTP transport is an external collaborator: the core only depends on
//! the `EmailSender` trait. The default implementation for local development
//! is `LogEmailSender`, which logs the message and returns `Ok(())`; real
//! deliveries (SMTP, HTTP API) plug in behind the same trait.

use crate::config::AppConfig;
use anyhow::Result;

/// 待投递的邮件
#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Email delivery abstraction.
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error to mark it as failed.
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug, Default)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "email send stub"
        );
        Ok(())
    }
}

/// 构造验证邮件，链接中嵌入验证令牌
pub fn verification_email(config: &AppConfig, to: &str, token: &str) -> EmailMessage {
    let verification_url = format!(
        "{}/api/auth/verify-email?token={}",
        config.server.public_url.trim_end_matches('/'),
        token
    );

    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Email Verification</h2>
  <p>Thank you for registering! Please click the link below to verify your email address:</p>
  <p style="text-align: center; margin: 30px 0;">
    <a href="{verification_url}" style="background-color: #007bff; color: white; padding: 12px 30px; text-decoration: none; border-radius: 5px; display: inline-block;">Verify Email</a>
  </p>
  <p style="color: #666; font-size: 14px;">If you didn't create an account, please ignore this email.</p>
</div>"#
    );

    EmailMessage {
        from: config.mail.from_address.clone(),
        to: to.to_string(),
        subject: "Email Verification - LearnHub".to_string(),
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AppConfig, DatabaseConfig, LoggingConfig, MailConfig, SecurityConfig, ServerConfig,
        UploadConfig,
    };
    use secrecy::Secret;

    fn test_config(public_url: &str) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:3000".to_string(),
                public_url: public_url.to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 5,
                min_connections: 1,
                acquire_timeout_secs: 5,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new("test_secret_key_32_characters_long!".to_string()),
                token_exp_secs: 86400,
                password_min_length: 6,
            },
            mail: MailConfig {
                from_address: "no-reply@learnhub.local".to_string(),
            },
            upload: UploadConfig {
                dir: "uploads".to_string(),
                max_file_size_bytes: 5_242_880,
            },
        }
    }

    #[test]
    fn test_verification_email_embeds_token() {
        let config = test_config("http://localhost:3000");
        let message = verification_email(&config, "jane@example.com", "tok123");

        assert_eq!(message.to, "jane@example.com");
        assert!(message
            .html_body
            .contains("http://localhost:3000/api/auth/verify-email?token=tok123"));
    }

    #[test]
    fn test_verification_email_handles_trailing_slash() {
        let config = test_config("https://learnhub.example/");
        let message = verification_email(&config, "jane@example.com", "tok123");

        assert!(message
            .html_body
            .contains("https://learnhub.example/api/auth/verify-email?token=tok123"));
    }

    #[test]
    fn test_log_sender_always_succeeds() {
        let sender = LogEmailSender;
        let config = test_config("http://localhost:3000");
        let message = verification_email(&config, "jane@example.com", "tok123");

        assert!(sender.send(&message).is_ok());
    }
}

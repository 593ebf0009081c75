//! 业务服务层

pub mod auth_service;
pub mod mail;

pub use auth_service::{AuthService, VerifyOutcome};
pub use mail::{EmailMessage, EmailSender, LogEmailSender};

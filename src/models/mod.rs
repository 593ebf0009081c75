//! 数据模型模块
//! 用户与课程实体、请求/响应 DTO

pub mod course;
pub mod user;

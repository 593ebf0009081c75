//! Database repository layer

pub mod course_repo;
pub mod user_repo;

pub use course_repo::*;
pub use user_repo::*;

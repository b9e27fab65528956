pub mod assignments;
pub mod attempts;
pub mod calendar;
pub mod catalog;
pub mod common;
pub mod exams;
pub mod grades;
pub mod questions;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, ErrorCode};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

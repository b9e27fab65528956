use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub subject_instance_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub weight: Option<f64>,        // 默认 1
    pub due_date: DateTime<Utc>,    // ISO 8601 格式，如 "2026-01-24T12:00:00Z"
    pub allow_late: Option<bool>,   // 默认 false
    pub late_penalty_percent: Option<f64>, // 默认 0
}

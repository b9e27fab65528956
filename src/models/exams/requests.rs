use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 创建考试请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateExamRequest {
    pub subject_instance_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub max_score: f64,
    pub passing_score: Option<f64>,
    pub start_time: DateTime<Utc>, // ISO 8601 格式
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub max_attempts: Option<i32>, // 默认 1
    pub shuffle_questions: Option<bool>,
    pub shuffle_options: Option<bool>,
}

/// 向考试添加题目
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct AddExamQuestionRequest {
    pub question_id: i64,
    pub points: Option<f64>,
    pub sort_order: Option<i32>, // 缺省时追加到末尾
}

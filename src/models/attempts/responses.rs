use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::ExamAttempt;
use crate::models::questions::entities::{PresentedOption, QuestionType};

/// 展示给学生的题目（不含标准答案）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct PresentedQuestion {
    pub question_id: i64,
    pub question_type: QuestionType,
    pub content: String,
    pub points: f64,
    pub options: Vec<PresentedOption>,
}

/// 作答视图
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptView {
    pub attempt: ExamAttempt,
    // 仅供客户端倒计时参考，服务端不以此为准
    pub deadline: DateTime<Utc>,
    pub passed: Option<bool>,
    pub questions: Vec<PresentedQuestion>,
}

/// 某考试的本人作答列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptListResponse {
    pub items: Vec<ExamAttempt>,
}

use serde::Deserialize;
use ts_rs::TS;

use super::entities::{AnswerKey, Difficulty, QuestionType};

/// 创建题库请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct CreateQuestionBankRequest {
    pub subject_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// 创建题目请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct CreateQuestionRequest {
    pub question_type: QuestionType,
    pub content: String,
    pub answer_key: AnswerKey,
    pub points: Option<f64>, // 默认 1
    pub difficulty: Option<Difficulty>,
}

/// 更新题目请求（被已发布考试引用后不可修改）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct UpdateQuestionRequest {
    pub question_type: Option<QuestionType>,
    pub content: Option<String>,
    pub answer_key: Option<AnswerKey>,
    pub points: Option<f64>,
    pub difficulty: Option<Difficulty>,
}

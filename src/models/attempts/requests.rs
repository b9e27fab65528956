use serde::Deserialize;
use ts_rs::TS;

/// 保存单题答案（可重复调用，按题目 ID 覆盖）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct SubmitAnswerRequest {
    pub question_id: i64,
    pub answer: serde_json::Value,
}

use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;

/// 作业的提交列表（教师视角）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<Submission>,
}

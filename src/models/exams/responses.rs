use serde::Serialize;
use ts_rs::TS;

use super::entities::{Exam, ExamQuestion};

/// 考试详情（教师视角含题目关联）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamDetail {
    pub exam: Exam,
    pub questions: Vec<ExamQuestion>,
}

/// 学生可见的考试列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamListResponse {
    pub items: Vec<Exam>,
}

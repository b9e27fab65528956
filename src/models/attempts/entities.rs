use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作答状态
//
// 提交与自动判分在同一次转换中完成，`Submitted` 只为兼容外部数据保留，
// 本引擎不会写入该状态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
    Graded,
}

impl AttemptStatus {
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const SUBMITTED: &'static str = "submitted";
    pub const GRADED: &'static str = "graded";

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptStatus::InProgress)
    }
}

impl std::fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptStatus::InProgress => write!(f, "{}", AttemptStatus::IN_PROGRESS),
            AttemptStatus::Submitted => write!(f, "{}", AttemptStatus::SUBMITTED),
            AttemptStatus::Graded => write!(f, "{}", AttemptStatus::GRADED),
        }
    }
}

impl std::str::FromStr for AttemptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AttemptStatus::IN_PROGRESS => Ok(AttemptStatus::InProgress),
            AttemptStatus::SUBMITTED => Ok(AttemptStatus::Submitted),
            AttemptStatus::GRADED => Ok(AttemptStatus::Graded),
            _ => Err(format!("Invalid attempt status: {s}")),
        }
    }
}

// 单题作答记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptAnswer {
    pub question_id: i64,
    pub answer: serde_json::Value,
    // 判分前为空
    pub is_correct: Option<bool>,
    pub points: Option<f64>,
    pub answered_at: DateTime<Utc>,
}

/// 按题目 ID 索引的答卷，同一题重复作答时覆盖
pub type AnswerSheet = BTreeMap<i64, AttemptAnswer>;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct ExamAttempt {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub attempt_number: i32,
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub correct_count: Option<i32>,
    // 开始作答时的题目数快照
    pub total_questions: i32,
    pub answers: AnswerSheet,
}

impl ExamAttempt {
    /// 写入或覆盖某题答案；判分字段在最终提交前始终为空
    pub fn upsert_answer(
        &mut self,
        question_id: i64,
        answer: serde_json::Value,
        now: DateTime<Utc>,
    ) {
        self.answers.insert(
            question_id,
            AttemptAnswer {
                question_id,
                answer,
                is_correct: None,
                points: None,
                answered_at: now,
            },
        );
    }
}

/// 作答次数统计所需的最小信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttemptSummary {
    pub id: i64,
    pub attempt_number: i32,
    pub status: AttemptStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upsert_replaces_by_question_id() {
        let now = Utc::now();
        let mut attempt = ExamAttempt {
            id: 1,
            exam_id: 1,
            student_id: 2,
            attempt_number: 1,
            status: AttemptStatus::InProgress,
            started_at: now,
            submitted_at: None,
            score: None,
            correct_count: None,
            total_questions: 3,
            answers: AnswerSheet::new(),
        };

        attempt.upsert_answer(20, json!("a"), now);
        attempt.upsert_answer(10, json!("b"), now);
        attempt.upsert_answer(20, json!("c"), now);

        assert_eq!(attempt.answers.len(), 2);
        assert_eq!(attempt.answers[&20].answer, json!("c"));
        let order: Vec<i64> = attempt.answers.keys().copied().collect();
        assert_eq!(order, vec![10, 20]);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(AttemptStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            "graded".parse::<AttemptStatus>().unwrap(),
            AttemptStatus::Graded
        );
        assert!(AttemptStatus::Graded.is_terminal());
        assert!(!AttemptStatus::InProgress.is_terminal());
    }
}

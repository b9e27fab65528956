use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::questions::entities::Question;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    pub id: i64,
    // 开课实例 ID
    pub subject_instance_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 满分
    pub max_score: f64,
    // 及格线（可选）
    pub passing_score: Option<f64>,
    // 作答窗口
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    // 作答时长（分钟）
    pub duration_minutes: i32,
    pub max_attempts: i32,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exam {
    /// 某次作答的建议截止时间（开始时间 + 时长，且不晚于窗口结束）
    pub fn attempt_deadline(&self, started_at: DateTime<Utc>) -> DateTime<Utc> {
        let by_duration = started_at + Duration::minutes(i64::from(self.duration_minutes));
        by_duration.min(self.end_time)
    }

    /// 是否达到及格线
    pub fn passed(&self, score: f64) -> Option<bool> {
        self.passing_score.map(|threshold| score >= threshold)
    }
}

// 考试与题目的关联（固定分值与顺序）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamQuestion {
    pub id: i64,
    pub exam_id: i64,
    pub question_id: i64,
    // 覆盖题目默认分值
    pub points: Option<f64>,
    pub sort_order: i32,
}

impl ExamQuestion {
    /// 本题在该考试中的分值
    pub fn effective_points(&self, question: &Question) -> f64 {
        self.points.unwrap_or(question.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn exam(duration_minutes: i32) -> Exam {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Exam {
            id: 1,
            subject_instance_id: 1,
            title: "Midterm".into(),
            description: None,
            max_score: 10.0,
            passing_score: Some(5.0),
            start_time: start,
            end_time: start + Duration::hours(2),
            duration_minutes,
            max_attempts: 1,
            shuffle_questions: false,
            shuffle_options: false,
            is_published: true,
            published_at: Some(start),
            created_by: 1,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_deadline_capped_by_window() {
        let exam = exam(90);
        let late_start = exam.start_time + Duration::minutes(60);
        assert_eq!(exam.attempt_deadline(late_start), exam.end_time);

        let early_start = exam.start_time;
        assert_eq!(
            exam.attempt_deadline(early_start),
            early_start + Duration::minutes(90)
        );
    }

    #[test]
    fn test_passed_only_with_threshold() {
        let mut exam = exam(60);
        assert_eq!(exam.passed(5.0), Some(true));
        assert_eq!(exam.passed(4.5), Some(false));
        exam.passing_score = None;
        assert_eq!(exam.passed(10.0), None);
    }
}

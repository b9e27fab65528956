//! 考试作答状态机的判定部分

use chrono::{DateTime, Duration, Utc};

use crate::errors::{LmsError, Result};
use crate::models::attempts::entities::{AttemptStatus, AttemptSummary};
use crate::models::exams::entities::Exam;

/// 开始作答的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDecision {
    /// 已有进行中的作答，原样返回
    Resume(i64),
    /// 新建一次作答
    Create {
        attempt_number: i32,
        total_questions: i32,
    },
}

/// 校验考试当前可以开始作答
pub fn ensure_exam_open(exam: &Exam, now: DateTime<Utc>) -> Result<()> {
    if !exam.is_published {
        return Err(LmsError::validation("Exam is not published"));
    }
    if now < exam.start_time {
        return Err(LmsError::validation("Exam has not started yet"));
    }
    if now > exam.end_time {
        return Err(LmsError::validation("Exam has already ended"));
    }
    Ok(())
}

/// 决定开始作答的结果
///
/// `prior` 为该学生在此考试下的全部作答（含进行中的）。
pub fn plan_start(
    exam: &Exam,
    prior: &[AttemptSummary],
    question_count: usize,
    now: DateTime<Utc>,
) -> Result<StartDecision> {
    ensure_exam_open(exam, now)?;

    if let Some(active) = prior
        .iter()
        .find(|a| a.status == AttemptStatus::InProgress)
    {
        return Ok(StartDecision::Resume(active.id));
    }

    let used = prior.len();
    if used >= exam.max_attempts.max(1) as usize {
        return Err(LmsError::attempt_limit(format!(
            "Maximum attempts reached ({used}/{})",
            exam.max_attempts
        )));
    }

    let attempt_number = prior
        .iter()
        .map(|a| a.attempt_number)
        .max()
        .unwrap_or(0)
        .max(used as i32)
        + 1;

    Ok(StartDecision::Create {
        attempt_number,
        total_questions: i32::try_from(question_count).unwrap_or(i32::MAX),
    })
}

/// 校验作答仍可保存答案
///
/// 服务端以结束时间为准，另加一段宽限时间容忍网络延迟。
pub fn ensure_answerable(
    status: AttemptStatus,
    exam: &Exam,
    now: DateTime<Utc>,
    grace: Duration,
) -> Result<()> {
    if status != AttemptStatus::InProgress {
        return Err(LmsError::invalid_state(format!(
            "Attempt is {status}, answers can no longer be changed"
        )));
    }
    if now > exam.end_time + grace {
        return Err(LmsError::validation("Exam has already ended"));
    }
    Ok(())
}

/// 校验作答可以交卷。进行中的作答无论是否超过结束时间都接受交卷。
pub fn ensure_submittable(status: AttemptStatus) -> Result<()> {
    if status != AttemptStatus::InProgress {
        return Err(LmsError::invalid_state(format!(
            "Attempt is {status}, it has already been submitted"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn exam(max_attempts: i32) -> Exam {
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
        Exam {
            id: 7,
            subject_instance_id: 1,
            title: "Quiz".into(),
            description: None,
            max_score: 2.0,
            passing_score: None,
            start_time: start,
            end_time: start + Duration::hours(1),
            duration_minutes: 30,
            max_attempts,
            shuffle_questions: false,
            shuffle_options: false,
            is_published: true,
            published_at: Some(start),
            created_by: 1,
            created_at: start,
            updated_at: start,
        }
    }

    fn graded(id: i64, attempt_number: i32) -> AttemptSummary {
        AttemptSummary {
            id,
            attempt_number,
            status: AttemptStatus::Graded,
        }
    }

    fn during(exam: &Exam) -> DateTime<Utc> {
        exam.start_time + Duration::minutes(10)
    }

    #[test]
    fn test_first_start_creates() {
        let exam = exam(1);
        assert_eq!(
            plan_start(&exam, &[], 2, during(&exam)).unwrap(),
            StartDecision::Create {
                attempt_number: 1,
                total_questions: 2
            }
        );
    }

    #[test]
    fn test_start_resumes_in_progress() {
        let exam = exam(1);
        let prior = [AttemptSummary {
            id: 41,
            attempt_number: 1,
            status: AttemptStatus::InProgress,
        }];
        // maxAttempts = 1 时重复开始仍返回同一作答
        assert_eq!(
            plan_start(&exam, &prior, 2, during(&exam)).unwrap(),
            StartDecision::Resume(41)
        );
    }

    #[test]
    fn test_attempt_ceiling_single() {
        let exam = exam(1);
        let err = plan_start(&exam, &[graded(1, 1)], 2, during(&exam)).unwrap_err();
        assert!(matches!(err, LmsError::AttemptLimit(_)));
    }

    #[test]
    fn test_attempt_ceiling_three() {
        let exam = exam(3);
        let now = during(&exam);
        assert_eq!(
            plan_start(&exam, &[graded(1, 1), graded(2, 2)], 5, now).unwrap(),
            StartDecision::Create {
                attempt_number: 3,
                total_questions: 5
            }
        );
        let err = plan_start(&exam, &[graded(1, 1), graded(2, 2), graded(3, 3)], 5, now)
            .unwrap_err();
        assert!(matches!(err, LmsError::AttemptLimit(_)));
    }

    #[test]
    fn test_window_and_publish_checks() {
        let mut exam = exam(2);
        let before = exam.start_time - Duration::seconds(1);
        let after = exam.end_time + Duration::seconds(1);
        assert!(matches!(
            plan_start(&exam, &[], 1, before),
            Err(LmsError::Validation(_))
        ));
        assert!(matches!(
            plan_start(&exam, &[], 1, after),
            Err(LmsError::Validation(_))
        ));
        // 边界时刻可以开始
        assert!(plan_start(&exam, &[], 1, exam.start_time).is_ok());
        assert!(plan_start(&exam, &[], 1, exam.end_time).is_ok());

        exam.is_published = false;
        assert!(matches!(
            plan_start(&exam, &[], 1, during(&exam)),
            Err(LmsError::Validation(_))
        ));
    }

    #[test]
    fn test_answer_grace_period() {
        let exam = exam(1);
        let grace = Duration::seconds(30);
        let slightly_late = exam.end_time + Duration::seconds(10);
        let too_late = exam.end_time + Duration::seconds(31);

        assert!(ensure_answerable(AttemptStatus::InProgress, &exam, slightly_late, grace).is_ok());
        assert!(matches!(
            ensure_answerable(AttemptStatus::InProgress, &exam, too_late, grace),
            Err(LmsError::Validation(_))
        ));
        assert!(matches!(
            ensure_answerable(AttemptStatus::Graded, &exam, during(&exam), grace),
            Err(LmsError::InvalidState(_))
        ));
    }

    #[test]
    fn test_submit_only_in_progress() {
        assert!(ensure_submittable(AttemptStatus::InProgress).is_ok());
        assert!(matches!(
            ensure_submittable(AttemptStatus::Graded),
            Err(LmsError::InvalidState(_))
        ));
        assert!(matches!(
            ensure_submittable(AttemptStatus::Submitted),
            Err(LmsError::InvalidState(_))
        ));
    }
}

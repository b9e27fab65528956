//! 作业提交生命周期的判定与迟交扣分

use chrono::{DateTime, Utc};

use crate::errors::{LmsError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::entities::SubmissionStatus;

/// 提交作业的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPlan {
    /// 需要原地更新的已有提交
    pub existing_id: Option<i64>,
    /// 本次提交是否迟交，写入后不再重算
    pub is_late: bool,
}

pub fn plan_submit(
    assignment: &Assignment,
    existing: Option<(i64, SubmissionStatus)>,
    now: DateTime<Utc>,
) -> Result<SubmitPlan> {
    if !assignment.is_published {
        return Err(LmsError::validation("Assignment is not published"));
    }

    let is_late = assignment.is_late_at(now);
    if is_late && !assignment.allow_late_submission {
        return Err(LmsError::validation(
            "Assignment is past due and does not accept late submissions",
        ));
    }

    let existing_id = match existing {
        None => None,
        Some((id, status)) if status.accepts_resubmission() => Some(id),
        Some((_, status)) => {
            return Err(LmsError::conflict(format!(
                "Submission already exists with status {status}"
            )));
        }
    };

    Ok(SubmitPlan {
        existing_id,
        is_late,
    })
}

/// 校验教师给出的分数
pub fn validate_score(score: f64, max_score: f64) -> Result<()> {
    if !score.is_finite() || score < 0.0 {
        return Err(LmsError::validation("Score must be a non-negative number"));
    }
    if score > max_score {
        return Err(LmsError::validation(format!(
            "Score {score} exceeds max score {max_score}"
        )));
    }
    Ok(())
}

/// 迟交扣分：按得分本身的百分比一次性扣除，不按天累计
pub fn apply_late_penalty(score: f64, is_late: bool, late_penalty_percent: f64) -> f64 {
    if !is_late || late_penalty_percent <= 0.0 {
        return score;
    }
    let penalized = score - score * late_penalty_percent / 100.0;
    super::round2(penalized.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn assignment(allow_late: bool) -> Assignment {
        let due = Utc.with_ymd_and_hms(2026, 4, 1, 23, 59, 0).unwrap();
        Assignment {
            id: 3,
            subject_instance_id: 1,
            title: "Essay".into(),
            description: None,
            max_score: 100.0,
            weight: 1.0,
            due_date: due,
            allow_late_submission: allow_late,
            late_penalty_percent: 10.0,
            is_published: true,
            published_at: Some(due - Duration::days(7)),
            created_by: 1,
            created_at: due - Duration::days(7),
            updated_at: due - Duration::days(7),
        }
    }

    #[test]
    fn test_late_penalty() {
        assert_eq!(apply_late_penalty(80.0, true, 10.0), 72.0);
        assert_eq!(apply_late_penalty(80.0, false, 10.0), 80.0);
        assert_eq!(apply_late_penalty(80.0, true, 0.0), 80.0);
        assert_eq!(apply_late_penalty(80.0, true, 150.0), 0.0);
    }

    #[test]
    fn test_first_submission_on_time() {
        let assignment = assignment(false);
        let plan = plan_submit(&assignment, None, assignment.due_date).unwrap();
        assert_eq!(
            plan,
            SubmitPlan {
                existing_id: None,
                is_late: false
            }
        );
    }

    #[test]
    fn test_late_submission_rules() {
        let after_due = assignment(false).due_date + Duration::minutes(1);
        assert!(matches!(
            plan_submit(&assignment(false), None, after_due),
            Err(LmsError::Validation(_))
        ));
        let plan = plan_submit(&assignment(true), None, after_due).unwrap();
        assert!(plan.is_late);
    }

    #[test]
    fn test_resubmission_only_from_pending_or_returned() {
        let assignment = assignment(true);
        let now = assignment.due_date - Duration::hours(1);

        let plan = plan_submit(&assignment, Some((9, SubmissionStatus::Returned)), now).unwrap();
        assert_eq!(plan.existing_id, Some(9));
        let plan = plan_submit(&assignment, Some((9, SubmissionStatus::Pending)), now).unwrap();
        assert_eq!(plan.existing_id, Some(9));

        for status in [SubmissionStatus::Submitted, SubmissionStatus::Graded] {
            assert!(matches!(
                plan_submit(&assignment, Some((9, status)), now),
                Err(LmsError::Conflict(_))
            ));
        }
    }

    #[test]
    fn test_unpublished_rejected() {
        let mut assignment = assignment(true);
        assignment.is_published = false;
        let now = assignment.due_date;
        assert!(matches!(
            plan_submit(&assignment, None, now),
            Err(LmsError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_score() {
        assert!(validate_score(100.0, 100.0).is_ok());
        assert!(validate_score(0.0, 100.0).is_ok());
        assert!(matches!(
            validate_score(100.5, 100.0),
            Err(LmsError::Validation(_))
        ));
        assert!(validate_score(-1.0, 100.0).is_err());
        assert!(validate_score(f64::NAN, 100.0).is_err());
    }
}

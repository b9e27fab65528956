use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::exams::requests::CreateExamRequest;

static SUBJECT_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{1,19}$").expect("Invalid subject code regex")
});

const MAX_TITLE_LENGTH: usize = 200;

pub fn validate_subject_code(code: &str) -> Result<(), &'static str> {
    // 科目代码：2-20 位字母、数字、下划线或连字符
    if !SUBJECT_CODE_RE.is_match(code) {
        return Err("Subject code must be 2-20 letters, digits, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title must not be empty");
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err("Title must be at most 200 characters");
    }
    Ok(())
}

pub fn validate_credits(credits: f64) -> Result<(), &'static str> {
    if !credits.is_finite() || credits <= 0.0 {
        return Err("Credits must be greater than 0");
    }
    Ok(())
}

/// 考试参数校验
pub fn validate_exam_request(req: &CreateExamRequest) -> Result<(), String> {
    validate_title(&req.title)?;
    if req.end_time <= req.start_time {
        return Err("end_time must be after start_time".into());
    }
    if req.duration_minutes <= 0 {
        return Err("duration_minutes must be greater than 0".into());
    }
    if matches!(req.max_attempts, Some(n) if n < 1) {
        return Err("max_attempts must be at least 1".into());
    }
    if !req.max_score.is_finite() || req.max_score <= 0.0 {
        return Err("max_score must be greater than 0".into());
    }
    match req.passing_score {
        Some(passing) if !(0.0..=req.max_score).contains(&passing) => Err(format!(
            "passing_score must be between 0 and max_score ({})",
            req.max_score
        )),
        _ => Ok(()),
    }
}

/// 作业参数校验
pub fn validate_assignment_request(req: &CreateAssignmentRequest) -> Result<(), String> {
    validate_title(&req.title)?;
    if !req.max_score.is_finite() || req.max_score <= 0.0 {
        return Err("max_score must be greater than 0".into());
    }
    if matches!(req.weight, Some(w) if !(w.is_finite() && w >= 0.0)) {
        return Err("weight must not be negative".into());
    }
    match req.late_penalty_percent {
        Some(pct) if !(0.0..=100.0).contains(&pct) => {
            Err("late_penalty_percent must be between 0 and 100".into())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn exam_request() -> CreateExamRequest {
        let now = Utc::now();
        CreateExamRequest {
            subject_instance_id: 1,
            title: "Midterm".into(),
            description: None,
            max_score: 20.0,
            passing_score: Some(10.0),
            start_time: now,
            end_time: now + Duration::hours(2),
            duration_minutes: 60,
            max_attempts: Some(1),
            shuffle_questions: None,
            shuffle_options: None,
        }
    }

    #[test]
    fn test_subject_code() {
        assert!(validate_subject_code("MATH101").is_ok());
        assert!(validate_subject_code("sci-2").is_ok());
        assert!(validate_subject_code("M").is_err());
        assert!(validate_subject_code("bad code").is_err());
    }

    #[test]
    fn test_exam_request_rules() {
        assert!(validate_exam_request(&exam_request()).is_ok());

        let mut inverted = exam_request();
        inverted.end_time = inverted.start_time;
        assert!(validate_exam_request(&inverted).is_err());

        let mut no_attempts = exam_request();
        no_attempts.max_attempts = Some(0);
        assert!(validate_exam_request(&no_attempts).is_err());

        let mut passing_too_high = exam_request();
        passing_too_high.passing_score = Some(25.0);
        assert!(validate_exam_request(&passing_too_high).is_err());
    }

    #[test]
    fn test_assignment_penalty_range() {
        let req = CreateAssignmentRequest {
            subject_instance_id: 1,
            title: "Lab".into(),
            description: None,
            max_score: 10.0,
            weight: None,
            due_date: Utc::now(),
            allow_late: Some(true),
            late_penalty_percent: Some(150.0),
        };
        assert!(validate_assignment_request(&req).is_err());
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::LmsError;

// 业务错误码（与 HTTP 状态码分离，前端按此分支处理）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    ValidationFailed = 1022,
    InternalServerError = 5000,

    // 日历与课程
    SemesterNotFound = 2001,
    NotEnrolled = 2005,

    // 考试
    QuestionNotFound = 3001,
    QuestionLocked = 3002,
    ExamNotFound = 3003,
    ExamNotOpen = 3004,
    AttemptNotFound = 3005,
    AttemptNotInProgress = 3006,
    AttemptLimitReached = 3007,

    // 作业
    AssignmentNotFound = 4001,
    SubmissionNotFound = 4002,
    SubmissionLocked = 4003,
    LateSubmissionNotAllowed = 4004,

    // 成绩
    GradeNotFound = 4501,
    GradeAlreadyExists = 4502,
}

impl ErrorCode {
    /// 把引擎错误映射为通用业务错误码
    pub fn from_error(err: &LmsError) -> Self {
        match err {
            LmsError::NotFound(_) => ErrorCode::NotFound,
            LmsError::Validation(_) => ErrorCode::ValidationFailed,
            LmsError::Conflict(_) => ErrorCode::Conflict,
            LmsError::InvalidState(_) => ErrorCode::AttemptNotInProgress,
            LmsError::AttemptLimit(_) => ErrorCode::AttemptLimitReached,
            LmsError::Authentication(_) => ErrorCode::Unauthorized,
            LmsError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_maps_to_codes() {
        assert_eq!(
            ErrorCode::from_error(&LmsError::not_found("exam")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from_error(&LmsError::attempt_limit("max")),
            ErrorCode::AttemptLimitReached
        );
        assert_eq!(
            ErrorCode::from_error(&LmsError::database_operation("boom")),
            ErrorCode::InternalServerError
        );
    }
}

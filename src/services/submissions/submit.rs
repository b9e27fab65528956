use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::LmsError;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn submit_assignment(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    let has_content = req.content.as_deref().is_some_and(|c| !c.trim().is_empty())
        || req.files.as_ref().is_some_and(|f| !f.is_empty());
    if !has_content {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "提交内容与附件不能同时为空",
        )));
    }

    let storage = service.get_storage(request);

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    match storage
        .is_enrolled(user_id, assignment.subject_instance_id)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::NotEnrolled,
                "您未选修该课程",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    }

    let now = chrono::Utc::now();
    let late_rejected = assignment.is_late_at(now) && !assignment.allow_late_submission;

    match storage
        .submit_assignment(assignment_id, user_id, req, now)
        .await
    {
        Ok(submission) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(submission, "提交成功")))
        }
        Err(LmsError::Validation(msg)) if late_rejected => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::LateSubmissionNotAllowed, msg))),
        // 已提交或已批改，不能覆盖
        Err(LmsError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionLocked, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

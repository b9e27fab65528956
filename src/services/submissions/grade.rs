use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::LmsError;
use crate::middlewares::RequireJWT;
use crate::models::submissions::requests::{GradeSubmissionRequest, ReturnSubmissionRequest};
use crate::models::{ApiResponse, ErrorCode};

pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    req: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let grader_id = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    let storage = service.get_storage(request);
    match storage
        .grade_submission(submission_id, grader_id, req, chrono::Utc::now())
        .await
    {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "批改成功"))),
        Err(LmsError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionNotFound, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn return_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    req: ReturnSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage
        .return_submission(submission_id, req.feedback, chrono::Utc::now())
        .await
    {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "已退回"))),
        Err(LmsError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionNotFound, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::middlewares::RequireJWT;
use crate::models::exams::requests::CreateExamRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_exam_request;

pub async fn create_exam(
    service: &ExamService,
    request: &HttpRequest,
    req: CreateExamRequest,
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

    if let Err(msg) = validate_exam_request(&req) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    match storage.create_exam(user_id, req, chrono::Utc::now()).await {
        Ok(exam) => {
            tracing::info!("Exam {} created by user {}", exam.id, user_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(exam, "创建成功")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

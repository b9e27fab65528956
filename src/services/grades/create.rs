use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use super::cache::invalidate_student;
use crate::errors::LmsError;
use crate::middlewares::RequireJWT;
use crate::models::grades::requests::CreateGradeRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_grade(
    service: &GradeService,
    request: &HttpRequest,
    req: CreateGradeRequest,
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

    let storage = service.get_storage(request);
    match storage
        .create_grade(req, user_id, chrono::Utc::now())
        .await
    {
        Ok(grade) => {
            let cache = service.get_cache(request);
            invalidate_student(cache.as_ref(), grade.student_id).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(grade, "录入成功")))
        }
        Err(LmsError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::GradeAlreadyExists, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

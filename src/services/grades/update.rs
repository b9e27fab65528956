use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use super::cache::invalidate_student;
use crate::middlewares::RequireJWT;
use crate::models::grades::requests::UpdateGradeRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
    req: UpdateGradeRequest,
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
        .update_grade(grade_id, req, user_id, chrono::Utc::now())
        .await
    {
        Ok(Some(grade)) => {
            let cache = service.get_cache(request);
            invalidate_student(cache.as_ref(), grade.student_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::GradeNotFound, "成绩不存在"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn enroll_student(
    service: &CatalogService,
    request: &HttpRequest,
    subject_instance_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage
        .enroll_student(subject_instance_id, student_id, chrono::Utc::now())
        .await
    {
        Ok(enrollment) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "选课成功")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn list_my_subject_instances(
    service: &CatalogService,
    request: &HttpRequest,
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
    match storage.list_enrolled_subject_instances(user_id).await {
        Ok(instances) => Ok(HttpResponse::Ok().json(ApiResponse::success(instances, "查询成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

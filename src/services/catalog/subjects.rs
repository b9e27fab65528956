use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CatalogService;
use crate::models::catalog::requests::{CreateSubjectInstanceRequest, CreateSubjectRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_credits, validate_subject_code, validate_title};

pub async fn create_subject(
    service: &CatalogService,
    request: &HttpRequest,
    req: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let checks = validate_subject_code(&req.code)
        .and_then(|_| validate_title(&req.name))
        .and_then(|_| validate_credits(req.credits));
    if let Err(msg) = checks {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    match storage.create_subject(req).await {
        Ok(subject) => Ok(HttpResponse::Created().json(ApiResponse::success(subject, "创建成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn create_subject_instance(
    service: &CatalogService,
    request: &HttpRequest,
    req: CreateSubjectInstanceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.create_subject_instance(req).await {
        Ok(instance) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(instance, "创建成功")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

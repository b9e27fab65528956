use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CalendarService;
use crate::models::calendar::requests::CreateAcademicYearRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_academic_year(
    service: &CalendarService,
    request: &HttpRequest,
    req: CreateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    if req.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "学年名称不能为空",
        )));
    }

    let storage = service.get_storage(request);
    match storage.create_academic_year(req).await {
        Ok(year) => Ok(HttpResponse::Created().json(ApiResponse::success(year, "创建成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn list_academic_years(
    service: &CalendarService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.list_academic_years().await {
        Ok(years) => Ok(HttpResponse::Ok().json(ApiResponse::success(years, "查询成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn set_current_academic_year(
    service: &CalendarService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.set_current_academic_year(id).await {
        Ok(Some(year)) => {
            tracing::info!("Academic year {} set as current", year.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(year, "设置成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "学年不存在",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

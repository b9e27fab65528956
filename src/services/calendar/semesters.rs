use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CalendarService;
use crate::models::calendar::requests::CreateSemesterRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_semester(
    service: &CalendarService,
    request: &HttpRequest,
    req: CreateSemesterRequest,
) -> ActixResult<HttpResponse> {
    if req.number < 1 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "学期序号必须大于 0",
        )));
    }

    let storage = service.get_storage(request);
    match storage.create_semester(req).await {
        Ok(semester) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(semester, "创建成功")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn set_current_semester(
    service: &CalendarService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.set_current_semester(id).await {
        Ok(Some(semester)) => {
            tracing::info!(
                "Semester {} (academic year {}) set as current",
                semester.id,
                semester.academic_year_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(semester, "设置成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SemesterNotFound,
            "学期不存在",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn get_current_semester(
    service: &CalendarService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_current_semester().await {
        Ok(Some(semester)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(semester, "查询成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SemesterNotFound,
            "尚未设置当前学期",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

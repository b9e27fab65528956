use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CalendarService;
use crate::models::calendar::requests::CreateGradingPeriodRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_grading_period(
    service: &CalendarService,
    request: &HttpRequest,
    req: CreateGradingPeriodRequest,
) -> ActixResult<HttpResponse> {
    if req.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "评分阶段名称不能为空",
        )));
    }

    let storage = service.get_storage(request);
    match storage.create_grading_period(req).await {
        Ok(period) => Ok(HttpResponse::Created().json(ApiResponse::success(period, "创建成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn list_grading_periods(
    service: &CalendarService,
    request: &HttpRequest,
    semester_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_semester_by_id(semester_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SemesterNotFound,
                "学期不存在",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    }

    match storage.list_grading_periods(semester_id).await {
        Ok(periods) => Ok(HttpResponse::Ok().json(ApiResponse::success(periods, "查询成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

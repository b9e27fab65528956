use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn publish_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage
        .publish_assignment(assignment_id, chrono::Utc::now())
        .await
    {
        Ok(Some(assignment)) => {
            tracing::info!("Assignment {} published", assignment.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "发布成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

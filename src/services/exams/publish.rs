use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn publish_exam(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.publish_exam(exam_id, chrono::Utc::now()).await {
        Ok(Some(exam)) => {
            tracing::info!("Exam {} published", exam.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(exam, "发布成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ExamNotFound, "考试不存在"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::errors::LmsError;
use crate::models::exams::requests::AddExamQuestionRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn add_exam_question(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    req: AddExamQuestionRequest,
) -> ActixResult<HttpResponse> {
    if matches!(req.points, Some(p) if !p.is_finite() || p <= 0.0) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "题目分值必须大于 0",
        )));
    }

    let storage = service.get_storage(request);
    match storage.add_exam_question(exam_id, req).await {
        Ok(link) => Ok(HttpResponse::Created().json(ApiResponse::success(link, "添加成功"))),
        Err(LmsError::InvalidState(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::QuestionLocked, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

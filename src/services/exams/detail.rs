use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::models::exams::responses::ExamDetail;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_exam_detail(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let exam = match storage.get_exam_by_id(exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::ExamNotFound, "考试不存在")));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    match storage.list_exam_questions(exam_id).await {
        Ok(questions) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamDetail { exam, questions },
            "查询成功",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_bank_questions(
    service: &QuestionService,
    request: &HttpRequest,
    bank_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_question_bank_by_id(bank_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::NotFound, "题库不存在")));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    }

    match storage.list_bank_questions(bank_id).await {
        Ok(questions) => Ok(HttpResponse::Ok().json(ApiResponse::success(questions, "查询成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn get_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_question_by_id(question_id).await {
        Ok(Some(question)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(question, "查询成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "题目不存在",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

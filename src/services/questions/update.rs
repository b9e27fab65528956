use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuestionService, check_points};
use crate::errors::LmsError;
use crate::models::questions::requests::UpdateQuestionRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_question(
    service: &QuestionService,
    request: &HttpRequest,
    question_id: i64,
    req: UpdateQuestionRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = check_points(req.points) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    match storage
        .update_question(question_id, req, chrono::Utc::now())
        .await
    {
        Ok(Some(question)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(question, "更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "题目不存在",
        ))),
        // 被已发布考试引用
        Err(LmsError::Conflict(msg)) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::QuestionLocked, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

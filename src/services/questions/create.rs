use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{QuestionService, check_points};
use crate::middlewares::RequireJWT;
use crate::models::questions::requests::CreateQuestionRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_question(
    service: &QuestionService,
    request: &HttpRequest,
    bank_id: i64,
    req: CreateQuestionRequest,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    if req.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "题目内容不能为空",
        )));
    }
    if let Err(msg) = check_points(req.points) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);

    match storage.get_question_bank_by_id(bank_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::NotFound, "题库不存在")));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    }

    match storage
        .create_question(bank_id, user_id, req, chrono::Utc::now())
        .await
    {
        Ok(question) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(question, "创建成功")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

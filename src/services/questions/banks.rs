use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::middlewares::RequireJWT;
use crate::models::questions::requests::CreateQuestionBankRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::validate_title;

pub async fn create_bank(
    service: &QuestionService,
    request: &HttpRequest,
    req: CreateQuestionBankRequest,
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

    if let Err(msg) = validate_title(&req.name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)));
    }

    let storage = service.get_storage(request);
    match storage
        .create_question_bank(user_id, req, chrono::Utc::now())
        .await
    {
        Ok(bank) => Ok(HttpResponse::Created().json(ApiResponse::success(bank, "创建成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn get_bank(
    service: &QuestionService,
    request: &HttpRequest,
    bank_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    match storage.get_question_bank_by_id(bank_id).await {
        Ok(Some(bank)) => Ok(HttpResponse::Ok().json(ApiResponse::success(bank, "查询成功"))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::NotFound, "题库不存在"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

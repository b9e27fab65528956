use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttemptService, current_user, load_owned_attempt};
use crate::config::AppConfig;
use crate::errors::LmsError;
use crate::models::attempts::requests::SubmitAnswerRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn save_answer(
    service: &AttemptService,
    request: &HttpRequest,
    attempt_id: i64,
    req: SubmitAnswerRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    if let Err(resp) = load_owned_attempt(&storage, &user, attempt_id, true).await {
        return Ok(resp);
    }

    let grace = AppConfig::get().answer_grace();
    match storage
        .save_attempt_answer(
            attempt_id,
            req.question_id,
            req.answer,
            chrono::Utc::now(),
            grace,
        )
        .await
    {
        Ok(answer) => Ok(HttpResponse::Ok().json(ApiResponse::success(answer, "保存成功"))),
        // 已超过结束时间与宽限期
        Err(LmsError::Validation(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ExamNotOpen, msg))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

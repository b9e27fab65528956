use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::view::load_attempt_view;
use super::{AttemptService, current_user};
use crate::errors::LmsError;
use crate::models::{ApiResponse, ErrorCode};

pub async fn start_attempt(
    service: &AttemptService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    let outcome = match storage
        .start_attempt(exam_id, user.id, chrono::Utc::now())
        .await
    {
        Ok(outcome) => outcome,
        // 未发布或不在作答窗口内
        Err(LmsError::Validation(msg)) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ExamNotOpen, msg)));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    let resumed = outcome.resumed;
    match load_attempt_view(&storage, outcome.attempt).await {
        Ok(view) if resumed => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(view, "继续作答")))
        }
        Ok(view) => Ok(HttpResponse::Created().json(ApiResponse::success(view, "开始作答"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

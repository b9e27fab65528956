use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::view::load_attempt_view;
use super::{AttemptService, current_user, load_owned_attempt};
use crate::models::ApiResponse;

pub async fn get_attempt(
    service: &AttemptService,
    request: &HttpRequest,
    attempt_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    let attempt = match load_owned_attempt(&storage, &user, attempt_id, false).await {
        Ok(attempt) => attempt,
        Err(resp) => return Ok(resp),
    };

    match load_attempt_view(&storage, attempt).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view, "查询成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

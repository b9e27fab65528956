use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::view::load_attempt_view;
use super::{AttemptService, current_user, load_owned_attempt};
use crate::models::ApiResponse;

pub async fn submit_attempt(
    service: &AttemptService,
    request: &HttpRequest,
    attempt_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    if let Err(resp) = load_owned_attempt(&storage, &user, attempt_id, true).await {
        return Ok(resp);
    }

    let attempt = match storage.submit_attempt(attempt_id, chrono::Utc::now()).await {
        Ok(attempt) => attempt,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    tracing::info!(
        "Attempt {} submitted by student {}, score {:?}",
        attempt.id,
        attempt.student_id,
        attempt.score
    );

    match load_attempt_view(&storage, attempt).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view, "交卷成功"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

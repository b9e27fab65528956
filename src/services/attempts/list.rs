use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttemptService, current_user};
use crate::models::ApiResponse;
use crate::models::attempts::responses::AttemptListResponse;

pub async fn list_my_attempts(
    service: &AttemptService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.list_student_attempts(exam_id, user.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttemptListResponse { items },
            "查询成功",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

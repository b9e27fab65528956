use std::collections::BTreeSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use super::cache::invalidate_student;
use crate::middlewares::RequireJWT;
use crate::models::grades::requests::BulkUpsertGradesRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn bulk_upsert_grades(
    service: &GradeService,
    request: &HttpRequest,
    req: BulkUpsertGradesRequest,
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

    if req.grades.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "成绩列表不能为空",
        )));
    }

    let storage = service.get_storage(request);
    let response = match storage
        .bulk_upsert_grades(req.grades, user_id, chrono::Utc::now())
        .await
    {
        Ok(response) => response,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    let cache = service.get_cache(request);
    let students: BTreeSet<i64> = response
        .results
        .iter()
        .filter(|r| r.success)
        .map(|r| r.student_id)
        .collect();
    for student_id in students {
        invalidate_student(cache.as_ref(), student_id).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "批量录入完成")))
}

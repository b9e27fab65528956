use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::cache::{generation, gpa_key, gpax_key};
use super::{GradeService, resolve_student};
use crate::cache::{get_json, insert_json};
use crate::config::AppConfig;
use crate::grading::gpa;
use crate::models::grades::requests::{GpaQuery, GpaxQuery};
use crate::models::grades::responses::{GpaResponse, GpaxResponse};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_gpa(
    service: &GradeService,
    request: &HttpRequest,
    query: GpaQuery,
) -> ActixResult<HttpResponse> {
    let student_id = match resolve_student(request, query.student_id) {
        Ok((_, student_id)) => student_id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);

    let semester_id = match query.semester_id {
        Some(id) => match storage.get_semester_by_id(id).await {
            Ok(Some(semester)) => semester.id,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SemesterNotFound,
                    "学期不存在",
                )));
            }
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        },
        None => match storage.get_current_semester().await {
            Ok(Some(semester)) => semester.id,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::SemesterNotFound,
                    "尚未设置当前学期",
                )));
            }
            Err(e) => return Ok(ApiResponse::from_error(&e)),
        },
    };

    let cache = service.get_cache(request);
    let key = gpa_key(
        student_id,
        &generation(cache.as_ref(), student_id).await,
        semester_id,
    );
    if let Some(cached) = get_json::<GpaResponse>(cache.as_ref(), &key).await {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(cached, "查询成功")));
    }

    let rows = match storage
        .list_grade_contributions(student_id, Some(semester_id))
        .await
    {
        Ok(rows) => rows,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    let response = gpa::semester_gpa(student_id, semester_id, rows);
    insert_json(
        cache.as_ref(),
        key,
        &response,
        AppConfig::get().cache.default_ttl,
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

pub async fn get_gpax(
    service: &GradeService,
    request: &HttpRequest,
    query: GpaxQuery,
) -> ActixResult<HttpResponse> {
    let student_id = match resolve_student(request, query.student_id) {
        Ok((_, student_id)) => student_id,
        Err(resp) => return Ok(resp),
    };

    let cache = service.get_cache(request);
    let key = gpax_key(student_id, &generation(cache.as_ref(), student_id).await);
    if let Some(cached) = get_json::<GpaxResponse>(cache.as_ref(), &key).await {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(cached, "查询成功")));
    }

    let storage = service.get_storage(request);
    let rows = match storage.list_grade_contributions(student_id, None).await {
        Ok(rows) => rows,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    let response = gpa::cumulative_gpax(student_id, &rows);
    if !response.multi_period_subject_instances.is_empty() {
        tracing::debug!(
            "Student {} has multiple grade rows for instances {:?}",
            student_id,
            response.multi_period_subject_instances
        );
    }
    insert_json(
        cache.as_ref(),
        key,
        &response,
        AppConfig::get().cache.default_ttl,
    )
    .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

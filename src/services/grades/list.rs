use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, resolve_student};
use crate::middlewares::RequireJWT;
use crate::models::grades::requests::GradeListQuery;
use crate::models::grades::responses::GradeListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    query: GradeListQuery,
) -> ActixResult<HttpResponse> {
    let student_id = match resolve_student(request, query.student_id) {
        Ok((_, student_id)) => student_id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage
        .list_student_grades(student_id, query.subject_instance_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeListResponse { items },
            "查询成功",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn get_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match RequireJWT::extract_current_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    let storage = service.get_storage(request);
    match storage.get_grade_by_id(grade_id).await {
        Ok(Some(grade)) if user.can_view_student(grade.student_id) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "查询成功")))
        }
        Ok(Some(_)) => Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能查看自己的成绩",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::GradeNotFound, "成绩不存在"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub mod bulk;
pub mod cache;
pub mod create;
pub mod gpa;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::models::grades::requests::{
    BulkUpsertGradesRequest, CreateGradeRequest, GpaQuery, GpaxQuery, GradeListQuery,
    UpdateGradeRequest,
};
use crate::models::users::entities::CurrentUser;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            cache: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        if let Some(cache) = &self.cache {
            cache.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
                .expect("Cache not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        req: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grade(self, request, req).await
    }

    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
        req: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grade(self, request, grade_id, req).await
    }

    pub async fn bulk_upsert_grades(
        &self,
        request: &HttpRequest,
        req: BulkUpsertGradesRequest,
    ) -> ActixResult<HttpResponse> {
        bulk::bulk_upsert_grades(self, request, req).await
    }

    pub async fn get_grade(
        &self,
        request: &HttpRequest,
        grade_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::get_grade(self, request, grade_id).await
    }

    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        query: GradeListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, request, query).await
    }

    /// 学期 GPA
    pub async fn get_gpa(
        &self,
        request: &HttpRequest,
        query: GpaQuery,
    ) -> ActixResult<HttpResponse> {
        gpa::get_gpa(self, request, query).await
    }

    /// 累计 GPAX
    pub async fn get_gpax(
        &self,
        request: &HttpRequest,
        query: GpaxQuery,
    ) -> ActixResult<HttpResponse> {
        gpa::get_gpax(self, request, query).await
    }
}

/// 解析查询目标学生：缺省为本人，学生不能查看他人
pub(crate) fn resolve_student(
    request: &HttpRequest,
    requested: Option<i64>,
) -> Result<(CurrentUser, i64), HttpResponse> {
    let user = RequireJWT::extract_current_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))
    })?;

    let student_id = requested.unwrap_or(user.id);
    if !user.can_view_student(student_id) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能查看自己的成绩",
        )));
    }
    Ok((user, student_id))
}

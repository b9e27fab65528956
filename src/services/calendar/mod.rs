pub mod academic_years;
pub mod grading_periods;
pub mod semesters;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::calendar::requests::{
    CreateAcademicYearRequest, CreateGradingPeriodRequest, CreateSemesterRequest,
};
use crate::storage::Storage;

pub struct CalendarService {
    storage: Option<Arc<dyn Storage>>,
}

impl CalendarService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
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

    /// 创建学年
    pub async fn create_academic_year(
        &self,
        request: &HttpRequest,
        req: CreateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        academic_years::create_academic_year(self, request, req).await
    }

    /// 列出学年
    pub async fn list_academic_years(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        academic_years::list_academic_years(self, request).await
    }

    /// 设为当前学年
    pub async fn set_current_academic_year(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        academic_years::set_current_academic_year(self, request, id).await
    }

    /// 创建学期
    pub async fn create_semester(
        &self,
        request: &HttpRequest,
        req: CreateSemesterRequest,
    ) -> ActixResult<HttpResponse> {
        semesters::create_semester(self, request, req).await
    }

    /// 设为当前学期
    pub async fn set_current_semester(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        semesters::set_current_semester(self, request, id).await
    }

    /// 获取当前学期
    pub async fn get_current_semester(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        semesters::get_current_semester(self, request).await
    }

    /// 创建评分阶段
    pub async fn create_grading_period(
        &self,
        request: &HttpRequest,
        req: CreateGradingPeriodRequest,
    ) -> ActixResult<HttpResponse> {
        grading_periods::create_grading_period(self, request, req).await
    }

    /// 列出学期的评分阶段
    pub async fn list_grading_periods(
        &self,
        request: &HttpRequest,
        semester_id: i64,
    ) -> ActixResult<HttpResponse> {
        grading_periods::list_grading_periods(self, request, semester_id).await
    }
}

pub mod enrollments;
pub mod subjects;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::catalog::requests::{CreateSubjectInstanceRequest, CreateSubjectRequest};
use crate::storage::Storage;

pub struct CatalogService {
    storage: Option<Arc<dyn Storage>>,
}

impl CatalogService {
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

    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        req: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::create_subject(self, request, req).await
    }

    pub async fn create_subject_instance(
        &self,
        request: &HttpRequest,
        req: CreateSubjectInstanceRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::create_subject_instance(self, request, req).await
    }

    /// 学生选课
    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        subject_instance_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        enrollments::enroll_student(self, request, subject_instance_id, student_id).await
    }

    /// 本人已选的开课实例
    pub async fn list_my_subject_instances(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enrollments::list_my_subject_instances(self, request).await
    }
}

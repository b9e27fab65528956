pub mod create;
pub mod detail;
pub mod list;
pub mod publish;
pub mod questions;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::exams::requests::{AddExamQuestionRequest, CreateExamRequest};
use crate::storage::Storage;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExamService {
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

    // 创建考试
    pub async fn create_exam(
        &self,
        request: &HttpRequest,
        req: CreateExamRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam(self, request, req).await
    }

    // 向考试添加题目
    pub async fn add_exam_question(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        req: AddExamQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        questions::add_exam_question(self, request, exam_id, req).await
    }

    // 发布考试
    pub async fn publish_exam(
        &self,
        request: &HttpRequest,
        exam_id: i64,
    ) -> ActixResult<HttpResponse> {
        publish::publish_exam(self, request, exam_id).await
    }

    // 考试详情（含题目关联）
    pub async fn get_exam_detail(
        &self,
        request: &HttpRequest,
        exam_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_exam_detail(self, request, exam_id).await
    }

    // 学生可见的考试列表
    pub async fn list_my_exams(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_exams(self, request).await
    }
}

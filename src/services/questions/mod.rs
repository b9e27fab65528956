pub mod banks;
pub mod create;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::questions::requests::{
    CreateQuestionBankRequest, CreateQuestionRequest, UpdateQuestionRequest,
};
use crate::storage::Storage;

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
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

    pub async fn create_bank(
        &self,
        request: &HttpRequest,
        req: CreateQuestionBankRequest,
    ) -> ActixResult<HttpResponse> {
        banks::create_bank(self, request, req).await
    }

    pub async fn get_bank(&self, request: &HttpRequest, bank_id: i64) -> ActixResult<HttpResponse> {
        banks::get_bank(self, request, bank_id).await
    }

    pub async fn create_question(
        &self,
        request: &HttpRequest,
        bank_id: i64,
        req: CreateQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_question(self, request, bank_id, req).await
    }

    pub async fn list_bank_questions(
        &self,
        request: &HttpRequest,
        bank_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_bank_questions(self, request, bank_id).await
    }

    pub async fn get_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::get_question(self, request, question_id).await
    }

    pub async fn update_question(
        &self,
        request: &HttpRequest,
        question_id: i64,
        req: UpdateQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_question(self, request, question_id, req).await
    }
}

/// 题目分值必须为正
pub(crate) fn check_points(points: Option<f64>) -> Result<(), String> {
    match points {
        Some(p) if !p.is_finite() || p <= 0.0 => Err("Points must be greater than 0".into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_points() {
        assert!(check_points(None).is_ok());
        assert!(check_points(Some(2.5)).is_ok());
        assert!(check_points(Some(0.0)).is_err());
        assert!(check_points(Some(-1.0)).is_err());
        assert!(check_points(Some(f64::NAN)).is_err());
    }
}

pub mod answer;
pub mod detail;
pub mod list;
pub mod start;
pub mod submit;
pub mod view;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::attempts::entities::ExamAttempt;
use crate::models::attempts::requests::SubmitAnswerRequest;
use crate::models::users::entities::CurrentUser;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AttemptService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttemptService {
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

    /// 开始（或继续）作答
    pub async fn start_attempt(
        &self,
        request: &HttpRequest,
        exam_id: i64,
    ) -> ActixResult<HttpResponse> {
        start::start_attempt(self, request, exam_id).await
    }

    /// 作答详情
    pub async fn get_attempt(
        &self,
        request: &HttpRequest,
        attempt_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_attempt(self, request, attempt_id).await
    }

    /// 本人在某考试下的作答
    pub async fn list_my_attempts(
        &self,
        request: &HttpRequest,
        exam_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_my_attempts(self, request, exam_id).await
    }

    /// 保存单题答案
    pub async fn save_answer(
        &self,
        request: &HttpRequest,
        attempt_id: i64,
        req: SubmitAnswerRequest,
    ) -> ActixResult<HttpResponse> {
        answer::save_answer(self, request, attempt_id, req).await
    }

    /// 交卷
    pub async fn submit_attempt(
        &self,
        request: &HttpRequest,
        attempt_id: i64,
    ) -> ActixResult<HttpResponse> {
        submit::submit_attempt(self, request, attempt_id).await
    }
}

pub(crate) fn current_user(request: &HttpRequest) -> Result<CurrentUser, HttpResponse> {
    RequireJWT::extract_current_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))
    })
}

/// 读取作答并检查访问权限
///
/// `owner_only` 为真时只有作答者本人可以访问（写操作），否则教职工也可查看。
pub(crate) async fn load_owned_attempt(
    storage: &Arc<dyn Storage>,
    user: &CurrentUser,
    attempt_id: i64,
    owner_only: bool,
) -> Result<ExamAttempt, HttpResponse> {
    let attempt = match storage.get_attempt_by_id(attempt_id).await {
        Ok(Some(attempt)) => attempt,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AttemptNotFound,
                "作答记录不存在",
            )));
        }
        Err(e) => return Err(ApiResponse::from_error(&e)),
    };

    let allowed = if owner_only {
        attempt.student_id == user.id
    } else {
        user.can_view_student(attempt.student_id)
    };
    if !allowed {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "无权访问该作答记录",
        )));
    }

    Ok(attempt)
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attempts::requests::SubmitAnswerRequest;
use crate::models::users::entities::UserRole;
use crate::services::AttemptService;

// 懒加载的全局 AttemptService 实例
static ATTEMPT_SERVICE: Lazy<AttemptService> = Lazy::new(AttemptService::new_lazy);

pub async fn get_attempt(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE.get_attempt(&req, path.into_inner()).await
}

// 保存单题答案（自动保存）
pub async fn save_answer(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SubmitAnswerRequest>,
) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .save_answer(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn submit_attempt(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .submit_attempt(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_attempts_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attempts")
            .wrap(middlewares::RequireJWT)
            // 本人或教职工可查看，业务层检查
            .service(web::resource("/{id}").route(web::get().to(get_attempt)))
            .service(
                web::resource("/{id}/answers")
                    .route(web::put().to(save_answer))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}/submit")
                    .route(web::post().to(submit_attempt))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            ),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::questions::requests::{
    CreateQuestionBankRequest, CreateQuestionRequest, UpdateQuestionRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::QuestionService;

// 懒加载的全局 QuestionService 实例
static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn create_bank(
    req: HttpRequest,
    body: web::Json<CreateQuestionBankRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.create_bank(&req, body.into_inner()).await
}

pub async fn get_bank(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.get_bank(&req, path.into_inner()).await
}

pub async fn create_question(
    req: HttpRequest,
    path: web::Path<i64>, // bank_id
    body: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .create_question(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn list_bank_questions(
    req: HttpRequest,
    path: web::Path<i64>, // bank_id
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .list_bank_questions(&req, path.into_inner())
        .await
}

pub async fn get_question(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.get_question(&req, path.into_inner()).await
}

pub async fn update_question(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .update_question(&req, path.into_inner(), body.into_inner())
        .await
}

// 配置路由，题库内容含标准答案，仅教师和管理员可访问
pub fn configure_questions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/question-banks")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("", web::post().to(create_bank))
                    .route("/{id}", web::get().to(get_bank))
                    .route("/{id}/questions", web::get().to(list_bank_questions))
                    .route("/{id}/questions", web::post().to(create_question)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/questions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/{id}", web::get().to(get_question))
                    .route("/{id}", web::put().to(update_question)),
            ),
    );
}

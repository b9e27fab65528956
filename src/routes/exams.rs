use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exams::requests::{AddExamQuestionRequest, CreateExamRequest};
use crate::models::users::entities::UserRole;
use crate::services::{AttemptService, ExamService};

// 懒加载的全局 ExamService 实例
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);
static ATTEMPT_SERVICE: Lazy<AttemptService> = Lazy::new(AttemptService::new_lazy);

pub async fn create_exam(
    req: HttpRequest,
    body: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(&req, body.into_inner()).await
}

pub async fn list_my_exams(req: HttpRequest) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_my_exams(&req).await
}

pub async fn get_exam_detail(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_exam_detail(&req, path.into_inner()).await
}

pub async fn add_exam_question(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AddExamQuestionRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .add_exam_question(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn publish_exam(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.publish_exam(&req, path.into_inner()).await
}

// 开始作答
pub async fn start_attempt(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .start_attempt(&req, path.into_inner())
        .await
}

// 本人在该考试下的作答
pub async fn list_my_attempts(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ATTEMPT_SERVICE
        .list_my_attempts(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::post()
                            .to(create_exam)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            // 学生可见的考试
            .service(web::resource("/my").route(web::get().to(list_my_exams)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_exam_detail))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/questions")
                    .route(web::post().to(add_exam_question))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/publish")
                    .route(web::post().to(publish_exam))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{id}/attempts")
                    .route(web::post().to(start_attempt))
                    .route(web::get().to(list_my_attempts))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            ),
    );
}

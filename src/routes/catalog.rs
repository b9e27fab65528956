use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::catalog::requests::{
    CreateSubjectInstanceRequest, CreateSubjectRequest, EnrollStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CatalogService;

// 懒加载的全局 CatalogService 实例
static CATALOG_SERVICE: Lazy<CatalogService> = Lazy::new(CatalogService::new_lazy);

pub async fn create_subject(
    req: HttpRequest,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.create_subject(&req, body.into_inner()).await
}

pub async fn create_subject_instance(
    req: HttpRequest,
    body: web::Json<CreateSubjectInstanceRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .create_subject_instance(&req, body.into_inner())
        .await
}

pub async fn enroll_student(
    req: HttpRequest,
    path: web::Path<i64>, // subject_instance_id
    body: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE
        .enroll_student(&req, path.into_inner(), body.student_id)
        .await
}

pub async fn list_my_subject_instances(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATALOG_SERVICE.list_my_subject_instances(&req).await
}

// 配置路由
pub fn configure_catalog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("", web::post().to(create_subject)),
            ),
    );

    cfg.service(
        web::scope("/api/v1/subject-instances")
            .wrap(middlewares::RequireJWT)
            .route("/my", web::get().to(list_my_subject_instances))
            .service(
                web::resource("")
                    .route(web::post().to(create_subject_instance))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}/enrollments")
                    .route(web::post().to(enroll_student))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}

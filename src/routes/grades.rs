use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{
    BulkUpsertGradesRequest, CreateGradeRequest, GpaQuery, GpaxQuery, GradeListQuery,
    UpdateGradeRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::GradeService;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_grades(
    req: HttpRequest,
    query: web::Query<GradeListQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(&req, query.into_inner()).await
}

pub async fn create_grade(
    req: HttpRequest,
    body: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.create_grade(&req, body.into_inner()).await
}

pub async fn bulk_upsert_grades(
    req: HttpRequest,
    body: web::Json<BulkUpsertGradesRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .bulk_upsert_grades(&req, body.into_inner())
        .await
}

pub async fn get_grade(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_grade(&req, path.into_inner()).await
}

pub async fn update_grade(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .update_grade(&req, path.into_inner(), body.into_inner())
        .await
}

pub async fn get_gpa(req: HttpRequest, query: web::Query<GpaQuery>) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_gpa(&req, query.into_inner()).await
}

pub async fn get_gpax(
    req: HttpRequest,
    query: web::Query<GpaxQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_gpax(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 学生只能查询本人，业务层检查
                    .route(web::get().to(list_grades))
                    .route(
                        web::post()
                            .to(create_grade)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/bulk")
                    .route(web::post().to(bulk_upsert_grades))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(web::resource("/gpa").route(web::get().to(get_gpa)))
            .service(web::resource("/gpax").route(web::get().to(get_gpax)))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_grade))
                    .route(
                        web::put()
                            .to(update_grade)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}

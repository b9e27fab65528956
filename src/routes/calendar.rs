use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::calendar::requests::{
    CreateAcademicYearRequest, CreateGradingPeriodRequest, CreateSemesterRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CalendarService;

// 懒加载的全局 CalendarService 实例
static CALENDAR_SERVICE: Lazy<CalendarService> = Lazy::new(CalendarService::new_lazy);

pub async fn create_academic_year(
    req: HttpRequest,
    body: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .create_academic_year(&req, body.into_inner())
        .await
}

pub async fn list_academic_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE.list_academic_years(&req).await
}

pub async fn set_current_academic_year(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .set_current_academic_year(&req, path.into_inner())
        .await
}

pub async fn create_semester(
    req: HttpRequest,
    body: web::Json<CreateSemesterRequest>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .create_semester(&req, body.into_inner())
        .await
}

pub async fn get_current_semester(req: HttpRequest) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE.get_current_semester(&req).await
}

pub async fn set_current_semester(
    req: HttpRequest,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .set_current_semester(&req, path.into_inner())
        .await
}

pub async fn list_grading_periods(
    req: HttpRequest,
    path: web::Path<i64>, // semester_id
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .list_grading_periods(&req, path.into_inner())
        .await
}

pub async fn create_grading_period(
    req: HttpRequest,
    body: web::Json<CreateGradingPeriodRequest>,
) -> ActixResult<HttpResponse> {
    CALENDAR_SERVICE
        .create_grading_period(&req, body.into_inner())
        .await
}

// 配置路由
pub fn configure_calendar_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/calendar")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/academic-years")
                    // 查询 - 所有登录用户可访问
                    .route(web::get().to(list_academic_years))
                    // 校历维护 - 仅管理员
                    .route(
                        web::post()
                            .to(create_academic_year)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/academic-years/{id}/current")
                    .route(web::put().to(set_current_academic_year))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/semesters")
                    .route(web::post().to(create_semester))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/semesters/current").route(web::get().to(get_current_semester)),
            )
            .service(
                web::resource("/semesters/{id}/current")
                    .route(web::put().to(set_current_semester))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/semesters/{id}/grading-periods")
                    .route(web::get().to(list_grading_periods)),
            )
            .service(
                web::resource("/grading-periods")
                    .route(web::post().to(create_grading_period))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}

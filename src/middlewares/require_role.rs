/*!
 * 角色门禁中间件
 *
 * 依赖 RequireJWT 写入请求扩展的 `CurrentUser`，只比较调用者的单一角色
 * 是否落在允许集合内。actix 中后注册的 wrap 先执行，因此角色检查要挂在
 * 内层 scope、resource 或 route 上，不能与 RequireJWT 挂在同一个 scope。
 *
 * ```rust,ignore
 * web::scope("/api/v1/grades")
 *     .wrap(RequireJWT)
 *     .service(
 *         web::resource("/bulk")
 *             .route(web::post().to(bulk_upsert_grades))
 *             .wrap(RequireRole::new_any(UserRole::teacher_roles())),
 *     )
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::create_error_response;
use crate::models::{
    ErrorCode,
    users::entities::{CurrentUser, UserRole},
};

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    /// 允许任一给定角色通过
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| **r).collect(),
        }
    }

    fn permits(allowed: &[UserRole], user: &CurrentUser) -> bool {
        allowed.contains(&user.role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let user = req.extensions().get::<CurrentUser>().cloned();

            let (status, code, message) = match user {
                Some(user) if RequireRole::permits(&allowed, &user) => {
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
                Some(user) => {
                    info!(
                        "Role {} of user {} not in {:?} for {}",
                        user.role,
                        user.id,
                        allowed,
                        req.path()
                    );
                    (StatusCode::FORBIDDEN, ErrorCode::Forbidden, "权限不足")
                }
                // RequireJWT 未生效
                None => {
                    info!("No caller in request extensions for {}", req.path());
                    (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, "未登录")
                }
            };

            Ok(req.into_response(
                create_error_response(status, code, message).map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits_only_listed_roles() {
        let teachers = RequireRole::new_any(UserRole::teacher_roles());
        let student = CurrentUser {
            id: 1,
            role: UserRole::Student,
        };
        let teacher = CurrentUser {
            id: 2,
            role: UserRole::Teacher,
        };
        assert!(RequireRole::permits(&teachers.allowed, &teacher));
        assert!(!RequireRole::permits(&teachers.allowed, &student));
    }
}

//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 JWT 토큰을 검증하고 요청자 신원을 추출합니다.
//!
//! 두 가지 진입점이 있습니다:
//!
//! - [`AuthMiddleware::required`] - 인증 실패 시 401로 거부 (strict)
//! - [`AuthMiddleware::optional`] - 실패해도 익명으로 계속 진행 (soft).
//!   공개지만 개인화 가능한 엔드포인트용이며 절대 요청을 거부하지 않습니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::domain::auth::authentication_request::{AuthMode, RequiredRole};
use crate::domain::entities::accounts::account::UserRole;
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
pub struct AuthMiddleware {
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    /// 새로운 인증 미들웨어 생성
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    /// 역할 요구사항이 있는 인증 미들웨어 생성
    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    /// 필수 인증 미들웨어 생성
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 선택적 인증 미들웨어 생성
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// 특정 역할 요구 인증 미들웨어 생성
    pub fn required_with_role(role: UserRole) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Single(role))
    }

    /// 복수 역할 중 하나 요구 인증 미들웨어 생성
    pub fn required_with_roles(roles: Vec<UserRole>) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Any(roles))
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::authenticated_user::AuthenticatedUser;

    #[test]
    fn test_required_role_single() {
        let required = RequiredRole::Single(UserRole::Admin);

        assert!(required.is_satisfied(UserRole::Admin));
        assert!(!required.is_satisfied(UserRole::User));
    }

    #[test]
    fn test_required_role_any() {
        let required = RequiredRole::Any(vec![UserRole::User, UserRole::Admin]);

        assert!(required.is_satisfied(UserRole::User));
        assert!(required.is_satisfied(UserRole::Admin));
    }

    #[test]
    fn test_authenticated_user_is_admin() {
        let admin = AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439011".to_string(),
            username: "root".to_string(),
            role: UserRole::Admin,
        };
        let user = AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439012".to_string(),
            username: "alice".to_string(),
            role: UserRole::User,
        };

        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }
}

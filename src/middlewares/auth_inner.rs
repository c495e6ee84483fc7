//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use crate::core::AppError;
use crate::domain::auth::authenticated_user::AuthenticatedUser;
use crate::domain::auth::authentication_request::{AuthMode, RequiredRole};
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::services::auth::session_service::ACCESS_TOKEN_COOKIE;
use crate::services::auth::token_service::TokenService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            // 토큰 추출/검증/계정 로드
            let auth_result = authenticate_request(&req).await;

            match (&mode, auth_result) {
                // Required 모드에서 인증 실패
                (AuthMode::Required, Err(err)) => {
                    log::warn!("인증 실패: {}", err);
                    let response = HttpResponse::Unauthorized()
                        .json(serde_json::json!({
                            "statusCode": 401,
                            "message": "유효한 인증 토큰이 필요합니다",
                            "success": false,
                            "errors": ["유효한 인증 토큰이 필요합니다"],
                        }));
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response)
                        .map_into_right_body();
                    return Ok(res);
                },
                // Required 모드에서 인증 성공
                (AuthMode::Required, Ok(user)) => {
                    // 역할 검증
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(user.role) {
                            log::warn!("권한 부족: 사용자 ID {} ({:?}), 필요 권한: {:?}",
                                user.user_id, user.role, required);
                            let response = HttpResponse::Forbidden()
                                .json(serde_json::json!({
                                    "statusCode": 403,
                                    "message": "접근 권한이 부족합니다",
                                    "success": false,
                                    "errors": ["접근 권한이 부족합니다"],
                                }));
                            let (req, _) = req.into_parts();
                            let res = ServiceResponse::new(req, response)
                                .map_into_right_body();
                            return Ok(res);
                        }
                    }

                    // 사용자 정보를 Request Extensions에 저장
                    req.extensions_mut().insert(user.clone());
                    log::debug!("인증 성공: 사용자 ID {}", user.user_id);
                },
                // Optional 모드에서 인증 성공
                (AuthMode::Optional, Ok(user)) => {
                    req.extensions_mut().insert(user.clone());
                    log::debug!("선택적 인증 성공: 사용자 ID {}", user.user_id);
                },
                // Optional 모드에서 인증 실패 (진행 허용)
                (AuthMode::Optional, Err(_)) => {
                    log::debug!("선택적 인증: 유효한 토큰 없음, 익명으로 진행");
                },
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청에서 액세스 토큰을 추출해 검증하고 계정을 로드합니다.
///
/// 토큰은 `Authorization: Bearer` 헤더 또는 `accessToken` 쿠키에서
/// 추출됩니다. 클레임에는 역할 정보가 없으므로 역할 검증을 위해
/// 계정을 저장소에서 로드합니다 (Redis 캐시 적용 경로).
async fn authenticate_request(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token_service = TokenService::instance();

    // Authorization 헤더 우선, 없으면 accessToken 쿠키
    let token = match req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(auth_header) => token_service.extract_bearer_token(auth_header)?.to_string(),
        None => req
            .request()
            .cookie(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| {
                AppError::AuthenticationError("인증 토큰이 없습니다".to_string())
            })?,
    };

    // 토큰 검증 및 클레임 추출
    let claims = token_service
        .verify_access_token(&token)
        .map_err(AppError::from)?;

    // 계정 로드 (탈퇴했거나 존재하지 않으면 인증 실패)
    let account_repo = AccountRepository::instance();
    let account = account_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("유효하지 않은 액세스 토큰입니다".to_string()))?;

    Ok(AuthenticatedUser::from(&account))
}

//! Account HTTP Handlers
//!
//! 계정 생명주기와 관련된 HTTP 엔드포인트를 처리하는 핸들러 함수들입니다.
//! 회원가입/로그인/이메일 인증/토큰 갱신/비밀번호 플로우/역할 할당을 담당합니다.
//!
//! 모든 응답은 `{statusCode, message, success, data}` 엔벨로프를 사용하며,
//! 로그인/토큰 갱신 성공 시 `accessToken`/`refreshToken` 쿠키가 함께 설정됩니다.

use actix_web::{get, patch, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::accounts::request::{
    AssignRoleRequest, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
    RefreshRequest, RegisterRequest, ResetPasswordRequest, UpdateAvatarRequest,
};
use crate::domain::dto::accounts::response::AuthResponse;
use crate::domain::ApiResponse;
use crate::services::accounts::account_service::AccountService;
use crate::services::auth::session_service::{
    self, SessionService, REFRESH_TOKEN_COOKIE,
};

/// 회원가입 핸들러
///
/// 계정을 생성하고 인증 메일을 발송합니다. 계정은 미인증 상태로 시작합니다.
///
/// # Endpoint
/// `POST /api/v1/accounts/register`
#[post("/register")]
pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account_service = AccountService::instance();
    let account = account_service.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::created(
        "회원가입이 완료되었습니다. 이메일을 확인하여 인증을 진행해주세요",
        json!({ "account": account }),
    )))
}

/// 로그인 핸들러
///
/// 이메일 또는 사용자명과 비밀번호로 인증하고, 성공 시 토큰 쌍을
/// 회전 발급하여 쿠키와 본문 양쪽에 담습니다. 실패 시 쿠키는 설정되지 않습니다.
///
/// # Endpoint
/// `POST /api/v1/accounts/login`
#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account_service = AccountService::instance();
    let (account, pair) = account_service
        .login(&payload.identifier, &payload.password)
        .await?;

    let (access_cookie, refresh_cookie) = session_service::auth_cookies(&pair);
    let response = AuthResponse::new(account, pair.access_token, pair.refresh_token);

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(ApiResponse::ok("로그인에 성공했습니다", response)))
}

/// 이메일 인증 핸들러
///
/// 메일 링크의 일회용 토큰을 소비합니다. 이미 사용되었거나 만료된
/// 토큰은 489로 거부됩니다.
///
/// # Endpoint
/// `GET /api/v1/accounts/verify-email/{token}`
#[get("/verify-email/{token}")]
pub async fn verify_email(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let client_token = path.into_inner();

    let account_service = AccountService::instance();
    account_service.verify_email(&client_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(200, "이메일 인증이 완료되었습니다")))
}

/// 토큰 갱신 핸들러
///
/// 리프레시 토큰은 `refreshToken` 쿠키 또는 요청 본문에서 받습니다.
/// 저장된 토큰과의 완전 일치가 요구되며, 불일치 시 쿠키는 갱신되지 않습니다.
///
/// # Endpoint
/// `POST /api/v1/accounts/refresh-token`
#[post("/refresh-token")]
pub async fn refresh_token(
    req: HttpRequest,
    payload: Option<web::Json<RefreshRequest>>,
) -> Result<HttpResponse, AppError> {
    let incoming = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| payload.and_then(|body| body.into_inner().refresh_token))
        .ok_or_else(|| AppError::AuthenticationError("리프레시 토큰이 없습니다".to_string()))?;

    let session_svc = SessionService::instance();
    let pair = session_svc.reconcile(&incoming).await?;

    let (access_cookie, refresh_cookie) = session_service::auth_cookies(&pair);

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(ApiResponse::ok(
            "액세스 토큰이 갱신되었습니다",
            json!({
                "access_token": pair.access_token,
                "refresh_token": pair.refresh_token,
            }),
        )))
}

/// 비밀번호 재설정 메일 요청 핸들러
///
/// # Endpoint
/// `POST /api/v1/accounts/forgot-password`
#[post("/forgot-password")]
pub async fn forgot_password(
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account_service = AccountService::instance();
    account_service.forgot_password(&payload.email).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(
        200,
        "비밀번호 재설정 메일을 발송했습니다",
    )))
}

/// 비밀번호 재설정 실행 핸들러
///
/// # Endpoint
/// `POST /api/v1/accounts/reset-password/{token}`
#[post("/reset-password/{token}")]
pub async fn reset_password(
    path: web::Path<String>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let client_token = path.into_inner();

    let account_service = AccountService::instance();
    account_service
        .reset_password(&client_token, &payload.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(200, "비밀번호가 재설정되었습니다")))
}

/// 현재 계정 조회 핸들러
///
/// # Endpoint
/// `GET /api/v1/me`
#[get("")]
pub async fn get_current_account(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let account_service = AccountService::instance();
    let account = account_service.current_account(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("현재 계정 정보를 조회했습니다", account)))
}

/// 로그아웃 핸들러
///
/// 저장된 리프레시 토큰을 무조건 제거하고 인증 쿠키를 만료시킵니다.
///
/// # Endpoint
/// `POST /api/v1/me/logout`
#[post("/logout")]
pub async fn logout(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let session_svc = SessionService::instance();
    session_svc.logout(&user.user_id).await?;

    let (access_cookie, refresh_cookie) = session_service::clearing_cookies();

    Ok(HttpResponse::Ok()
        .cookie(access_cookie)
        .cookie(refresh_cookie)
        .json(ApiResponse::message(200, "로그아웃 되었습니다")))
}

/// 이메일 인증 메일 재발송 핸들러
///
/// # Endpoint
/// `POST /api/v1/me/resend-verification`
#[post("/resend-verification")]
pub async fn resend_verification(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let account_service = AccountService::instance();
    account_service.resend_verification(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(
        200,
        "인증 메일을 다시 발송했습니다",
    )))
}

/// 비밀번호 변경 핸들러
///
/// # Endpoint
/// `POST /api/v1/me/change-password`
#[post("/change-password")]
pub async fn change_password(
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account_service = AccountService::instance();
    account_service
        .change_password(&user.user_id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(200, "비밀번호가 변경되었습니다")))
}

/// 아바타 갱신 핸들러
///
/// 업로드 결과 디스크립터 `{url, public_id}`를 받아 교체합니다.
///
/// # Endpoint
/// `PATCH /api/v1/me/avatar`
#[patch("/avatar")]
pub async fn update_avatar(
    user: AuthenticatedUser,
    payload: web::Json<UpdateAvatarRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account_service = AccountService::instance();
    let account = account_service
        .update_avatar(&user.user_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("아바타가 변경되었습니다", account)))
}

/// 역할 할당 핸들러 (관리자 전용)
///
/// # Endpoint
/// `POST /api/v1/admin/accounts/{account_id}/role`
#[post("/accounts/{account_id}/role")]
pub async fn assign_role(
    path: web::Path<String>,
    payload: web::Json<AssignRoleRequest>,
) -> Result<HttpResponse, AppError> {
    let account_id = path.into_inner();

    let account_service = AccountService::instance();
    account_service
        .assign_role(&account_id, payload.role)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(200, "역할이 할당되었습니다")))
}

//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 기능별로 그룹화하여 제공합니다.
//! 계정, 프로필, 팔로우 라우트와 헬스체크 엔드포인트를 포함합니다.
//!
//! # Auth Middleware Usage
//!
//! 라우트 그룹에 따라 다른 인증 레벨이 적용됩니다:
//!
//! - **Public**: 회원가입/로그인/이메일 인증/토큰 갱신/비밀번호 재설정
//! - **Soft** (`AuthMiddleware::optional`): 사용자명 프로필 조회 -
//!   토큰이 없거나 깨져도 익명으로 통과하며, 유효하면 뷰어 관계가 계산됩니다
//! - **Strict** (`AuthMiddleware::required`): 내 정보/프로필 수정/팔로우
//! - **Admin** (`AuthMiddleware::required_with_role`): 역할 할당

use crate::domain::entities::accounts::account::UserRole;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use chrono;
use serde_json::json;

/// 모든 라우트를 설정합니다
///
/// # Examples
///
/// ```rust,ignore
/// use actix_web::{web, App};
///
/// let app = App::new().configure(configure_all_routes);
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    // Feature-specific routes
    configure_account_routes(cfg);
    configure_profile_routes(cfg);
    configure_follow_routes(cfg);
}

/// 계정 관련 라우트를 설정합니다
///
/// # Route Groups
///
/// ## Public 라우트 (인증 불필요)
/// - `POST /api/v1/accounts/register` - 회원가입
/// - `POST /api/v1/accounts/login` - 로그인
/// - `GET /api/v1/accounts/verify-email/{token}` - 이메일 인증
/// - `POST /api/v1/accounts/refresh-token` - 토큰 갱신
/// - `POST /api/v1/accounts/forgot-password` - 재설정 메일 요청
/// - `POST /api/v1/accounts/reset-password/{token}` - 비밀번호 재설정
///
/// ## Protected 라우트 (인증 필요)
/// - `GET /api/v1/me` - 현재 계정 조회
/// - `POST /api/v1/me/logout` - 로그아웃
/// - `POST /api/v1/me/resend-verification` - 인증 메일 재발송
/// - `POST /api/v1/me/change-password` - 비밀번호 변경
/// - `PATCH /api/v1/me/avatar` - 아바타 갱신
///
/// ## Admin 라우트 (ADMIN 역할 필요)
/// - `POST /api/v1/admin/accounts/{account_id}/role` - 역할 할당
fn configure_account_routes(cfg: &mut web::ServiceConfig) {
    // Public routes
    cfg.service(
        web::scope("/api/v1/accounts")
            .service(handlers::accounts::register)
            .service(handlers::accounts::login)
            .service(handlers::accounts::verify_email)
            .service(handlers::accounts::refresh_token)
            .service(handlers::accounts::forgot_password)
            .service(handlers::accounts::reset_password)
    );

    // Protected routes
    cfg.service(
        web::scope("/api/v1/me")
            .wrap(AuthMiddleware::required())
            .service(handlers::accounts::get_current_account)
            .service(handlers::accounts::logout)
            .service(handlers::accounts::resend_verification)
            .service(handlers::accounts::change_password)
            .service(handlers::accounts::update_avatar)
    );

    // Admin routes
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(AuthMiddleware::required_with_role(UserRole::Admin))
            .service(handlers::accounts::assign_role)
    );
}

/// 프로필 관련 라우트를 설정합니다
///
/// # Available Routes
///
/// - `GET /api/v1/profiles/u/{username}` - 사용자명 프로필 조회 (soft 인증)
/// - `GET /api/v1/profile/me` - 내 프로필 조회
/// - `PATCH /api/v1/profile` - 프로필 수정
/// - `PATCH /api/v1/profile/cover-image` - 커버 이미지 갱신
fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    // Public + soft 인증 (토큰이 유효하면 뷰어 관계가 계산됨)
    cfg.service(
        web::scope("/api/v1/profiles")
            .wrap(AuthMiddleware::optional())
            .service(handlers::profiles::get_profile_by_username)
    );

    // Protected routes
    cfg.service(
        web::scope("/api/v1/profile")
            .wrap(AuthMiddleware::required())
            .service(handlers::profiles::get_my_profile)
            .service(handlers::profiles::update_profile)
            .service(handlers::profiles::update_cover_image)
    );
}

/// 팔로우 관련 라우트를 설정합니다
///
/// # Available Routes
///
/// - `POST /api/v1/follows/{followee_id}` - 팔로우
/// - `DELETE /api/v1/follows/{followee_id}` - 언팔로우
fn configure_follow_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/follows")
            .wrap(AuthMiddleware::required())
            .service(handlers::follows::follow_account)
            .service(handlers::follows::unfollow_account)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// 로드밸런서나 모니터링 시스템에서 서비스 상태를 확인하는 데 사용됩니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "social_network_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "dependency_injection": "Singleton Macro"
        }
    }))
}

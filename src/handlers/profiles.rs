//! Profile HTTP Handlers
//!
//! 프로필 집계 조회/수정 엔드포인트를 처리하는 핸들러 함수들입니다.
//!
//! 사용자명 기반 조회는 공개 라우트지만 soft 인증이 걸려 있어,
//! 유효한 토큰이 동봉된 경우 `is_following`이 뷰어 기준으로 계산됩니다.

use actix_web::{get, patch, web, HttpResponse};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::auth::authenticated_user::{AuthenticatedUser, OptionalUser};
use crate::domain::dto::profiles::request::{UpdateCoverImageRequest, UpdateProfileRequest};
use crate::domain::ApiResponse;
use crate::services::profiles::profile_service::ProfileService;

/// 사용자명으로 프로필 조회 핸들러 (공개 + soft 인증)
///
/// # Endpoint
/// `GET /api/v1/profiles/u/{username}`
#[get("/u/{username}")]
pub async fn get_profile_by_username(
    path: web::Path<String>,
    viewer: OptionalUser,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();

    let profile_service = ProfileService::instance();
    let profile = profile_service
        .view_by_username(&username, viewer.0.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("프로필을 조회했습니다", profile)))
}

/// 내 프로필 조회 핸들러
///
/// 자기 자신 조회이므로 뷰어 관계 조회는 수행되지 않고
/// `is_following`은 항상 `false`입니다.
///
/// # Endpoint
/// `GET /api/v1/profile/me`
#[get("/me")]
pub async fn get_my_profile(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let profile_service = ProfileService::instance();
    let profile = profile_service.view_by_owner(&user.user_id, None).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("프로필을 조회했습니다", profile)))
}

/// 프로필 부분 갱신 핸들러
///
/// # Endpoint
/// `PATCH /api/v1/profile`
#[patch("")]
pub async fn update_profile(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let profile_service = ProfileService::instance();
    let profile = profile_service.update(&user, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("프로필이 수정되었습니다", profile)))
}

/// 커버 이미지 갱신 핸들러
///
/// # Endpoint
/// `PATCH /api/v1/profile/cover-image`
#[patch("/cover-image")]
pub async fn update_cover_image(
    user: AuthenticatedUser,
    payload: web::Json<UpdateCoverImageRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let profile_service = ProfileService::instance();
    let cover = profile_service
        .update_cover_image(&user, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "커버 이미지가 변경되었습니다",
        serde_json::json!({ "cover_image": cover }),
    )))
}

//! Follow HTTP Handlers
//!
//! 팔로우/언팔로우 엔드포인트를 처리하는 핸들러 함수들입니다.

use actix_web::{delete, post, web, HttpResponse};

use crate::core::errors::AppError;
use crate::domain::auth::authenticated_user::AuthenticatedUser;
use crate::domain::ApiResponse;
use crate::services::follows::follow_service::FollowService;

/// 팔로우 핸들러
///
/// # Endpoint
/// `POST /api/v1/follows/{followee_id}`
#[post("/{followee_id}")]
pub async fn follow_account(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let followee_id = path.into_inner();

    let follow_service = FollowService::instance();
    follow_service.follow(&user.user_id, &followee_id).await?;

    Ok(HttpResponse::Created().json(ApiResponse::<()>::message(201, "팔로우했습니다")))
}

/// 언팔로우 핸들러
///
/// # Endpoint
/// `DELETE /api/v1/follows/{followee_id}`
#[delete("/{followee_id}")]
pub async fn unfollow_account(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let followee_id = path.into_inner();

    let follow_service = FollowService::instance();
    follow_service.unfollow(&user.user_id, &followee_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(200, "팔로우를 취소했습니다")))
}

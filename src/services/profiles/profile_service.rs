//! # 프로필 집계 서비스 구현
//!
//! 프로필 조회/수정 비즈니스 로직입니다. 조회는 프로필 필드에 계정 공개
//! 정보, 팔로잉/팔로워 수, 뷰어 관계를 결합한 단일 집계 쿼리로 수행됩니다.

use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::auth::authenticated_user::AuthenticatedUser;
use crate::domain::dto::profiles::request::{UpdateCoverImageRequest, UpdateProfileRequest};
use crate::domain::dto::profiles::response::ProfileView;
use crate::domain::entities::accounts::account::MediaAsset;
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::repositories::profiles::profile_repo::ProfileRepository;
use crate::services::media::storage_service::MediaStorageService;
use crate::utils::string_utils::normalize_identifier;

/// 프로필 집계/관리 서비스
#[service(name = "profile")]
pub struct ProfileService {
    /// 계정 데이터 액세스 리포지토리 (자동 주입)
    account_repo: Arc<AccountRepository>,

    /// 프로필 데이터 액세스 리포지토리 (자동 주입)
    profile_repo: Arc<ProfileRepository>,
}

impl ProfileService {
    /// 계정 ID로 프로필 집계 조회
    ///
    /// 뷰어 관계(`is_following`) 조회는 인증된 뷰어가 존재하고 대상과
    /// 다른 경우에만 수행됩니다. 익명 조회와 자기 자신 조회에서는
    /// 조회 자체를 생략하고 `false`로 둡니다. 자기 자신에 대한 팔로우
    /// 엣지 조회는 의미가 없으므로 이것은 정합성 규칙입니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 계정 또는 프로필 레코드가 없는 경우
    pub async fn view_by_owner(
        &self,
        owner_id: &str,
        viewer: Option<&AuthenticatedUser>,
    ) -> Result<ProfileView, AppError> {
        let owner = ObjectId::parse_str(owner_id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        // 계정 존재 확인 (프로필만 남은 고아 레코드 방지)
        self.account_repo
            .find_by_id(owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        let viewer_oid = viewer
            .filter(|user| user.user_id != owner_id)
            .and_then(|user| ObjectId::parse_str(&user.user_id).ok());

        let view = self.profile_repo
            .aggregate_view(&owner, viewer_oid.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("프로필이 존재하지 않습니다".to_string()))?;

        if view.account.is_none() {
            return Err(AppError::NotFound("프로필이 존재하지 않습니다".to_string()));
        }

        Ok(view)
    }

    /// 사용자명으로 프로필 집계 조회 (공개 라우트)
    pub async fn view_by_username(
        &self,
        username: &str,
        viewer: Option<&AuthenticatedUser>,
    ) -> Result<ProfileView, AppError> {
        let username = normalize_identifier(username);

        let account = self.account_repo
            .find_by_username(&username)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        let owner_id = account.id_string().ok_or_else(|| {
            AppError::InternalError("계정 ID가 없습니다".to_string())
        })?;

        self.view_by_owner(&owner_id, viewer).await
    }

    /// 프로필 부분 갱신
    ///
    /// 요청에 포함된 필드만 `$set`으로 반영한 뒤 최신 집계 뷰를 돌려줍니다.
    pub async fn update(
        &self,
        owner: &AuthenticatedUser,
        request: UpdateProfileRequest,
    ) -> Result<ProfileView, AppError> {
        let owner_oid = ObjectId::parse_str(&owner.user_id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let update_doc = build_profile_update(&request);

        if !update_doc.is_empty() {
            self.profile_repo
                .update_by_owner(&owner_oid, update_doc)
                .await?
                .ok_or_else(|| AppError::NotFound("프로필이 존재하지 않습니다".to_string()))?;
        }

        self.view_by_owner(&owner.user_id, None).await
    }

    /// 커버 이미지 교체
    ///
    /// 교체되는 이전 자산은 미디어 게이트웨이에 best-effort로 삭제 요청합니다.
    pub async fn update_cover_image(
        &self,
        owner: &AuthenticatedUser,
        request: UpdateCoverImageRequest,
    ) -> Result<MediaAsset, AppError> {
        let owner_oid = ObjectId::parse_str(&owner.user_id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let profile = self.profile_repo
            .find_by_owner(&owner_oid)
            .await?
            .ok_or_else(|| AppError::NotFound("프로필이 존재하지 않습니다".to_string()))?;

        if let Some(previous) = profile.cover_image.public_id.as_deref() {
            MediaStorageService::instance().delete(previous).await;
        }

        let cover = MediaAsset {
            url: request.url,
            public_id: Some(request.public_id),
        };

        self.profile_repo
            .set_cover_image(&owner_oid, &cover)
            .await?
            .ok_or_else(|| AppError::NotFound("프로필이 존재하지 않습니다".to_string()))?;

        Ok(cover)
    }
}

/// 프로필 갱신 요청에서 `$set` 문서를 구성합니다.
///
/// 전달되지 않은 필드는 문서에 포함되지 않아 기존 값이 유지됩니다.
fn build_profile_update(request: &UpdateProfileRequest) -> Document {
    let mut update_doc = Document::new();

    if let Some(bio) = &request.bio {
        update_doc.insert("bio", bio);
    }
    if let Some(dob) = &request.dob {
        update_doc.insert("dob", DateTime::from_millis(dob.timestamp_millis()));
    }
    if let Some(location) = &request.location {
        update_doc.insert("location", location);
    }
    if let Some(website) = &request.website {
        update_doc.insert("website", website);
    }
    if let Some(country_code) = &request.country_code {
        update_doc.insert("country_code", country_code);
    }
    if let Some(phone_number) = &request.phone_number {
        update_doc.insert("phone_number", phone_number);
    }
    if let Some(social_links) = &request.social_links {
        let links = doc! {
            "facebook": social_links.facebook.as_deref().unwrap_or_default(),
            "twitter": social_links.twitter.as_deref().unwrap_or_default(),
            "linkedin": social_links.linkedin.as_deref().unwrap_or_default(),
            "github": social_links.github.as_deref().unwrap_or_default(),
        };
        update_doc.insert("social_links", links);
    }
    if let Some(interests) = &request.interests {
        update_doc.insert("interests", interests.clone());
    }

    update_doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_profile_update_only_sets_provided_fields() {
        let request = UpdateProfileRequest {
            bio: Some("Rust backend developer in Seoul".to_string()),
            location: Some("Seoul".to_string()),
            ..Default::default()
        };

        let update_doc = build_profile_update(&request);

        assert_eq!(update_doc.get_str("bio").unwrap(), "Rust backend developer in Seoul");
        assert_eq!(update_doc.get_str("location").unwrap(), "Seoul");
        assert!(!update_doc.contains_key("website"));
        assert!(!update_doc.contains_key("dob"));
        assert!(!update_doc.contains_key("interests"));
    }

    #[test]
    fn test_build_profile_update_empty_request() {
        let update_doc = build_profile_update(&UpdateProfileRequest::default());
        assert!(update_doc.is_empty());
    }

    #[test]
    fn test_build_profile_update_converts_dob() {
        let dob = chrono::DateTime::parse_from_rfc3339("1995-05-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let request = UpdateProfileRequest {
            dob: Some(dob),
            ..Default::default()
        };

        let update_doc = build_profile_update(&request);
        let stored = update_doc.get_datetime("dob").unwrap();

        assert_eq!(stored.timestamp_millis(), dob.timestamp_millis());
    }
}

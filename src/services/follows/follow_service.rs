//! # 팔로우 그래프 서비스 구현
//!
//! 팔로우/언팔로우 비즈니스 로직입니다. 자기 자신 팔로우와 중복 팔로우는
//! 이 계층에서 거부됩니다 (저장소에는 쌍 유니크 제약이 없음).

use std::sync::Arc;
use mongodb::bson::oid::ObjectId;
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::repositories::follows::follow_repo::FollowRepository;

/// 팔로우 그래프 비즈니스 로직 서비스
#[service(name = "follow")]
pub struct FollowService {
    /// 계정 데이터 액세스 리포지토리 (자동 주입)
    account_repo: Arc<AccountRepository>,

    /// 팔로우 데이터 액세스 리포지토리 (자동 주입)
    follow_repo: Arc<FollowRepository>,
}

impl FollowService {
    /// 팔로우 관계 생성
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 자기 자신을 팔로우하려는 경우
    /// * `AppError::NotFound` - 대상 계정이 존재하지 않는 경우
    /// * `AppError::ConflictError` - 이미 팔로우 중인 경우
    pub async fn follow(&self, follower_id: &str, followee_id: &str) -> Result<(), AppError> {
        if follower_id == followee_id {
            return Err(AppError::ValidationError(
                "자기 자신은 팔로우할 수 없습니다".to_string(),
            ));
        }

        let follower = parse_object_id(follower_id)?;
        let followee = parse_object_id(followee_id)?;

        self.account_repo
            .find_by_id(followee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("대상 계정을 찾을 수 없습니다".to_string()))?;

        // 중복 검사와 삽입 사이에는 원자성이 없다. 경합 시 중복 엣지가
        // 생길 수 있고 집계 카운트에 반영된다 (문서 모델 전반과 동일한
        // last-write-wins 정책).
        if self.follow_repo.exists(&follower, &followee).await? {
            return Err(AppError::ConflictError("이미 팔로우하고 있습니다".to_string()));
        }

        self.follow_repo.create(follower, followee).await?;

        log::debug!("팔로우 생성 - {} -> {}", follower_id, followee_id);
        Ok(())
    }

    /// 팔로우 관계 제거
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 팔로우 관계가 존재하지 않는 경우
    pub async fn unfollow(&self, follower_id: &str, followee_id: &str) -> Result<(), AppError> {
        let follower = parse_object_id(follower_id)?;
        let followee = parse_object_id(followee_id)?;

        let deleted = self.follow_repo.delete(&follower, &followee).await?;

        if !deleted {
            return Err(AppError::NotFound("팔로우 관계가 존재하지 않습니다".to_string()));
        }

        log::debug!("팔로우 제거 - {} -> {}", follower_id, followee_id);
        Ok(())
    }
}

fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))
}

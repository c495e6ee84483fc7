//! # 팔로우 리포지토리 구현
//!
//! 방향성 있는 팔로우 엣지의 저장/삭제/존재 확인을 담당합니다.
//! 쌍의 유일성은 저장소 인덱스가 아니라 서비스 계층의 사전 검사로 다룹니다.

use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId};
use singleton_macro::repository;
use crate::{
    core::errors::AppError,
    core::registry::Repository,
    db::Database,
    domain::entities::follows::follow::Follow,
};

/// 팔로우 엣지 데이터 액세스 리포지토리
#[repository(name = "follow", collection = "follows")]
pub struct FollowRepository {
    /// MongoDB 데이터베이스 연결 (자동 주입)
    db: Arc<Database>,
}

impl FollowRepository {
    /// 주어진 (follower, followee) 엣지가 존재하는지 확인합니다.
    pub async fn exists(
        &self,
        follower_id: &ObjectId,
        followee_id: &ObjectId,
    ) -> Result<bool, AppError> {
        let edge = self.collection::<Follow>()
            .find_one(doc! {
                "follower_id": follower_id,
                "followee_id": followee_id,
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(edge.is_some())
    }

    /// 새 팔로우 엣지를 저장합니다.
    pub async fn create(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
    ) -> Result<Follow, AppError> {
        let mut follow = Follow::new(follower_id, followee_id);

        let result = self.collection::<Follow>()
            .insert_one(&follow)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        follow.id = result.inserted_id.as_object_id();
        Ok(follow)
    }

    /// 팔로우 엣지를 삭제합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(true)` - 엣지가 삭제됨
    /// * `Ok(false)` - 삭제할 엣지가 존재하지 않음
    pub async fn delete(
        &self,
        follower_id: &ObjectId,
        followee_id: &ObjectId,
    ) -> Result<bool, AppError> {
        let result = self.collection::<Follow>()
            .delete_one(doc! {
                "follower_id": follower_id,
                "followee_id": followee_id,
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }
}

//! Follow Edge Entity
//!
//! 방향성 있는 팔로우 관계 `(follower_id, followee_id)`를 표현합니다.
//! 쌍의 유일성은 저장소 제약이 아니라 서비스 계층에서 검사합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 팔로우 관계 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 팔로우를 거는 쪽
    pub follower_id: ObjectId,
    /// 팔로우를 받는 쪽
    pub followee_id: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Follow {
    /// 새 팔로우 관계를 생성합니다.
    pub fn new(follower_id: ObjectId, followee_id: ObjectId) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            follower_id,
            followee_id,
            created_at: now,
            updated_at: now,
        }
    }
}

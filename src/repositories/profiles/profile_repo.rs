//! # 프로필 리포지토리 구현
//!
//! 프로필 엔티티의 CRUD와 프로필 집계 쿼리를 담당합니다.
//!
//! 집계는 단일 aggregation 파이프라인으로 수행됩니다. 계정 공개 필드,
//! 팔로잉/팔로워 수, 뷰어 관계를 한 번의 읽기로 결합하여 카운트 조회와
//! 관계 조회 사이의 비일관성을 차단합니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use singleton_macro::repository;
use crate::{
    core::errors::AppError,
    core::registry::Repository,
    db::Database,
    domain::dto::profiles::response::ProfileView,
    domain::entities::accounts::account::MediaAsset,
    domain::entities::profiles::profile::Profile,
};

/// 프로필 데이터 액세스 리포지토리
#[repository(name = "profile", collection = "profiles")]
pub struct ProfileRepository {
    /// MongoDB 데이터베이스 연결 (자동 주입)
    db: Arc<Database>,
}

impl ProfileRepository {
    /// 새 프로필 저장
    pub async fn create(&self, mut profile: Profile) -> Result<Profile, AppError> {
        let result = self.collection::<Profile>()
            .insert_one(&profile)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        profile.id = result.inserted_id.as_object_id();
        Ok(profile)
    }

    /// 소유 계정으로 프로필 조회
    pub async fn find_by_owner(&self, owner: &ObjectId) -> Result<Option<Profile>, AppError> {
        self.collection::<Profile>()
            .find_one(doc! { "profile_owner": owner })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 소유 계정 기준 부분 업데이트
    ///
    /// 전달된 필드들을 `$set`으로 반영하고 `updated_at`을 함께 갱신합니다.
    pub async fn update_by_owner(
        &self,
        owner: &ObjectId,
        mut update_doc: Document,
    ) -> Result<Option<Profile>, AppError> {
        update_doc.insert("updated_at", DateTime::now());

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        self.collection::<Profile>()
            .find_one_and_update(
                doc! { "profile_owner": owner },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 커버 이미지 교체
    pub async fn set_cover_image(
        &self,
        owner: &ObjectId,
        cover_image: &MediaAsset,
    ) -> Result<Option<Profile>, AppError> {
        let cover = mongodb::bson::to_bson(cover_image)
            .map_err(|e| AppError::InternalError(format!("커버 이미지 직렬화 실패: {}", e)))?;

        self.update_by_owner(owner, doc! { "cover_image": cover }).await
    }

    /// 프로필 집계 조회
    ///
    /// 대상 계정의 프로필에 계정 공개 필드, 팔로잉/팔로워 수,
    /// (뷰어가 있는 경우) 뷰어 관계를 결합한 읽기 모델을 반환합니다.
    ///
    /// # 인자
    ///
    /// * `owner` - 조회 대상 계정의 ObjectId
    /// * `viewer` - 인증된 뷰어의 ObjectId. 뷰어가 없거나 대상과 동일하면
    ///   `None`을 전달해야 하며, 이 경우 `is_following`은 `false`로 고정됩니다.
    pub async fn aggregate_view(
        &self,
        owner: &ObjectId,
        viewer: Option<&ObjectId>,
    ) -> Result<Option<ProfileView>, AppError> {
        let pipeline = build_profile_pipeline(owner, viewer);

        let mut cursor = self.collection::<Profile>()
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let document = cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        match document {
            Some(document) => {
                let view = mongodb::bson::from_document::<ProfileView>(document)
                    .map_err(|e| AppError::InternalError(format!("프로필 집계 역직렬화 실패: {}", e)))?;
                Ok(Some(view))
            }
            None => Ok(None),
        }
    }
}

/// 프로필 집계 파이프라인을 구성합니다.
///
/// ```text
/// $match   profile_owner == owner
/// $lookup  accounts  → account[] (공개 필드만 $project)
/// $lookup  follows   → following[]   (대상이 follower인 엣지)
/// $lookup  follows   → followed_by[] (대상이 followee인 엣지)
/// $addFields account: $first, following_count/followed_by_count: $size
/// ($lookup follows → viewer_edge[], is_following: $size > 0)   -- 뷰어가 있을 때만
/// $project 원시 엣지 배열 제거
/// ```
///
/// 뷰어 단계는 뷰어가 존재하고 대상과 다른 경우에만 추가됩니다.
/// 자기 자신 조회와 익명 조회에서 `is_following`이 `false`인 것은
/// 최적화가 아니라 정합성 규칙입니다.
pub(crate) fn build_profile_pipeline(owner: &ObjectId, viewer: Option<&ObjectId>) -> Vec<Document> {
    let mut pipeline = vec![
        doc! {
            "$match": { "profile_owner": owner }
        },
        doc! {
            "$lookup": {
                "from": "accounts",
                "localField": "profile_owner",
                "foreignField": "_id",
                "as": "account",
                "pipeline": [
                    {
                        "$project": {
                            "full_name": 1,
                            "avatar": 1,
                            "username": 1,
                            "email": 1,
                            "is_email_verified": 1,
                        }
                    }
                ],
            }
        },
        doc! {
            "$lookup": {
                "from": "follows",
                "localField": "profile_owner",
                "foreignField": "follower_id",
                "as": "following",
            }
        },
        doc! {
            "$lookup": {
                "from": "follows",
                "localField": "profile_owner",
                "foreignField": "followee_id",
                "as": "followed_by",
            }
        },
        doc! {
            "$addFields": {
                "account": { "$first": "$account" },
                "following_count": { "$size": "$following" },
                "followed_by_count": { "$size": "$followed_by" },
            }
        },
    ];

    if let Some(viewer) = viewer {
        pipeline.push(doc! {
            "$lookup": {
                "from": "follows",
                "as": "viewer_edge",
                "pipeline": [
                    {
                        "$match": {
                            "follower_id": viewer,
                            "followee_id": owner,
                        }
                    },
                    { "$limit": 1 },
                ],
            }
        });
        pipeline.push(doc! {
            "$addFields": {
                "is_following": { "$gt": [ { "$size": "$viewer_edge" }, 0 ] },
            }
        });
    }

    pipeline.push(doc! {
        "$project": {
            "following": 0,
            "followed_by": 0,
            "viewer_edge": 0,
        }
    });

    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_without_viewer_has_no_viewer_stage() {
        let owner = ObjectId::new();
        let pipeline = build_profile_pipeline(&owner, None);

        // match + 3 lookups + addFields + project
        assert_eq!(pipeline.len(), 6);

        let has_viewer_lookup = pipeline.iter().any(|stage| {
            stage
                .get_document("$lookup")
                .map(|lookup| lookup.get_str("as") == Ok("viewer_edge"))
                .unwrap_or(false)
        });
        assert!(!has_viewer_lookup);

        let computes_is_following = pipeline.iter().any(|stage| {
            stage
                .get_document("$addFields")
                .map(|fields| fields.contains_key("is_following"))
                .unwrap_or(false)
        });
        assert!(!computes_is_following);
    }

    #[test]
    fn test_pipeline_with_viewer_appends_edge_lookup() {
        let owner = ObjectId::new();
        let viewer = ObjectId::new();
        let pipeline = build_profile_pipeline(&owner, Some(&viewer));

        assert_eq!(pipeline.len(), 8);

        let edge_lookup = &pipeline[5];
        let lookup = edge_lookup.get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), "follows");
        assert_eq!(lookup.get_str("as").unwrap(), "viewer_edge");

        let is_following = &pipeline[6];
        assert!(is_following
            .get_document("$addFields")
            .unwrap()
            .contains_key("is_following"));
    }

    #[test]
    fn test_pipeline_starts_with_owner_match() {
        let owner = ObjectId::new();
        let pipeline = build_profile_pipeline(&owner, None);

        let matched = pipeline[0].get_document("$match").unwrap();
        assert_eq!(matched.get_object_id("profile_owner").unwrap(), owner);
    }

    #[test]
    fn test_pipeline_projects_raw_edges_away() {
        let owner = ObjectId::new();
        let pipeline = build_profile_pipeline(&owner, None);

        let project = pipeline.last().unwrap().get_document("$project").unwrap();
        assert_eq!(project.get_i32("following").unwrap(), 0);
        assert_eq!(project.get_i32("followed_by").unwrap(), 0);
    }
}

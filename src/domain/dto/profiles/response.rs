//! 프로필 집계 읽기 모델
//!
//! Profile Aggregator의 집계 파이프라인 출력 문서를 역직렬화하는 타입들입니다.
//! 프로필 필드에 계정 공개 정보, 팔로우 수, 뷰어 관계가 결합됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::entities::accounts::account::MediaAsset;
use crate::domain::entities::profiles::profile::SocialLinks;

/// 집계 응답에 포함되는 계정 공개 필드
///
/// 파이프라인의 `$lookup` + `$project` 단계가 만드는 부분 문서와 1:1 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCard {
    pub full_name: String,
    pub avatar: MediaAsset,
    pub username: String,
    pub email: String,
    pub is_email_verified: bool,
}

/// 프로필 집계 읽기 모델
///
/// 하나의 집계 쿼리 결과를 그대로 담습니다. `is_following`은 뷰어가
/// 존재하고 대상과 다른 경우에만 파이프라인이 계산하며, 그 외에는
/// 기본값 `false`로 남습니다 (자기 자신에 대한 팔로우 조회는 무의미).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    #[serde(rename = "_id", skip_serializing)]
    pub id: Option<ObjectId>,

    #[serde(serialize_with = "serialize_object_id_as_hex")]
    pub profile_owner: ObjectId,

    pub bio: String,

    #[serde(serialize_with = "serialize_optional_datetime")]
    pub dob: Option<DateTime>,

    pub location: String,
    pub website: String,
    pub country_code: String,
    pub phone_number: String,
    pub social_links: SocialLinks,
    pub interests: Vec<String>,
    pub cover_image: MediaAsset,

    /// 계정 공개 정보 (계정이 삭제된 경우 None)
    pub account: Option<AccountCard>,

    /// 대상이 팔로우하는 계정 수
    pub following_count: i64,
    /// 대상을 팔로우하는 계정 수
    pub followed_by_count: i64,

    /// 뷰어가 대상을 팔로우하는지 여부
    #[serde(default)]
    pub is_following: bool,

    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime,
    #[serde(serialize_with = "serialize_datetime")]
    pub updated_at: DateTime,
}

fn serialize_object_id_as_hex<S: Serializer>(
    oid: &ObjectId,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&oid.to_hex())
}

fn serialize_datetime<S: Serializer>(dt: &DateTime, serializer: S) -> Result<S::Ok, S::Error> {
    match dt.try_to_rfc3339_string() {
        Ok(s) => serializer.serialize_str(&s),
        Err(_) => serializer.serialize_none(),
    }
}

fn serialize_optional_datetime<S: Serializer>(
    dt: &Option<DateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match dt {
        Some(value) => match value.try_to_rfc3339_string() {
            Ok(s) => serializer.serialize_some(&s),
            Err(_) => serializer.serialize_none(),
        },
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_profile_view_deserializes_without_viewer_stage() {
        // 뷰어 단계가 없는 파이프라인 출력에는 is_following 필드가 없다
        let owner = ObjectId::new();
        let document = doc! {
            "_id": ObjectId::new(),
            "profile_owner": owner,
            "bio": "",
            "location": "",
            "website": "",
            "country_code": "",
            "phone_number": "",
            "social_links": {},
            "interests": [],
            "cover_image": { "url": "https://via.placeholder.com/1500x500" },
            "account": {
                "full_name": "Alice Kim",
                "avatar": { "url": "https://via.placeholder.com/200x200.png" },
                "username": "alice",
                "email": "alice@example.com",
                "is_email_verified": true,
            },
            "following_count": 3_i64,
            "followed_by_count": 7_i64,
            "created_at": DateTime::now(),
            "updated_at": DateTime::now(),
        };

        let view: ProfileView = mongodb::bson::from_document(document).unwrap();

        assert!(!view.is_following);
        assert_eq!(view.following_count, 3);
        assert_eq!(view.followed_by_count, 7);
        assert_eq!(view.account.as_ref().unwrap().username, "alice");
    }

    #[test]
    fn test_profile_view_serializes_owner_as_hex() {
        let owner = ObjectId::new();
        let document = doc! {
            "profile_owner": owner,
            "bio": "", "location": "", "website": "",
            "country_code": "", "phone_number": "",
            "social_links": {},
            "interests": [],
            "cover_image": { "url": "x" },
            "account": mongodb::bson::Bson::Null,
            "following_count": 0_i64,
            "followed_by_count": 0_i64,
            "is_following": true,
            "created_at": DateTime::now(),
            "updated_at": DateTime::now(),
        };

        let view: ProfileView = mongodb::bson::from_document(document).unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["profile_owner"], owner.to_hex());
        assert_eq!(json["is_following"], true);
        assert!(json.get("_id").is_none());
    }
}

//! Profile Entity Implementation
//!
//! 계정과 1:1로 연결되는 프로필 엔티티입니다.
//! 회원가입 시 계정과 함께 생성되며 생명주기가 계정에 묶여 있습니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::domain::entities::accounts::account::MediaAsset;

/// 프로필에 연결된 소셜 링크 모음
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// 프로필 엔티티
///
/// `profile_owner`를 통해 계정과 1:1 관계를 가집니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 프로필 소유 계정의 ObjectId
    pub profile_owner: ObjectId,
    /// 자기소개
    pub bio: String,
    /// 생년월일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<DateTime>,
    /// 거주 지역
    pub location: String,
    /// 웹사이트 URL
    pub website: String,
    /// 국가 코드
    pub country_code: String,
    /// 전화번호
    pub phone_number: String,
    /// 소셜 링크
    pub social_links: SocialLinks,
    /// 관심사 목록
    pub interests: Vec<String>,
    /// 커버 이미지
    pub cover_image: MediaAsset,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
}

impl Profile {
    /// 지정한 계정을 위한 빈 프로필을 생성합니다.
    pub fn new_for(owner: ObjectId) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            profile_owner: owner,
            bio: String::new(),
            dob: None,
            location: String::new(),
            website: String::new(),
            country_code: String::new(),
            phone_number: String::new(),
            social_links: SocialLinks::default(),
            interests: Vec::new(),
            cover_image: MediaAsset::default_cover(),
            created_at: now,
            updated_at: now,
        }
    }
}

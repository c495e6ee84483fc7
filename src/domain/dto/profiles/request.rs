//! 프로필 요청 DTO

use serde::Deserialize;
use validator::Validate;

/// 프로필의 소셜 링크 갱신 요청
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SocialLinksRequest {
    #[validate(url(message = "유효한 URL 형식이 아닙니다"))]
    pub facebook: Option<String>,
    #[validate(url(message = "유효한 URL 형식이 아닙니다"))]
    pub twitter: Option<String>,
    #[validate(url(message = "유효한 URL 형식이 아닙니다"))]
    pub linkedin: Option<String>,
    #[validate(url(message = "유효한 URL 형식이 아닙니다"))]
    pub github: Option<String>,
}

/// 프로필 부분 갱신 요청
///
/// 모든 필드는 선택사항이며, 전달된 필드만 `$set`으로 반영됩니다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 10, max = 100, message = "자기소개는 10-100자 사이여야 합니다"))]
    pub bio: Option<String>,

    /// 생년월일 (RFC 3339)
    pub dob: Option<chrono::DateTime<chrono::Utc>>,

    #[validate(length(min = 3, max = 50, message = "지역은 3-50자 사이여야 합니다"))]
    pub location: Option<String>,

    #[validate(url(message = "유효한 URL 형식이 아닙니다"))]
    pub website: Option<String>,

    pub country_code: Option<String>,

    #[validate(length(min = 10, max = 10, message = "전화번호는 10자리여야 합니다"))]
    pub phone_number: Option<String>,

    #[validate(nested)]
    pub social_links: Option<SocialLinksRequest>,

    pub interests: Option<Vec<String>>,
}

/// 커버 이미지 갱신 요청
///
/// 아바타와 마찬가지로 업로드 결과 디스크립터만 전달받습니다.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCoverImageRequest {
    #[validate(url(message = "유효한 URL 형식이 아닙니다"))]
    pub url: String,

    #[validate(length(min = 1, message = "public_id는 필수입니다"))]
    pub public_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_rejects_short_bio() {
        let request = UpdateProfileRequest {
            bio: Some("too short".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_profile_allows_empty_request() {
        let request = UpdateProfileRequest::default();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_social_links_url_validation() {
        let request = UpdateProfileRequest {
            social_links: Some(SocialLinksRequest {
                github: Some("not a url".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}

//! Account Entity Implementation
//!
//! 계정 엔티티의 핵심 구현체입니다.
//! 계정은 모든 토큰(리프레시 토큰, 일회용 토큰)의 애그리게이트 루트이며,
//! 토큰 값들은 서비스 계층에서 계산되어 단일 저장 연산으로 이 문서에 부착됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 사용자 역할
///
/// 저장소와 API 양쪽에서 `"USER"` / `"ADMIN"` 문자열로 표현됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// 문자열에서 UserRole을 생성합니다 (대소문자 무관).
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(format!("Unsupported role: {}", s)),
        }
    }

    /// 역할의 문자열 표현을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

/// 외부 스토리지에 업로드된 미디어 자산 참조
///
/// 코어는 원본 바이트를 다루지 않고 공개 URL과
/// 스토리지 프로바이더의 불투명한 id 쌍만 보관합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    /// 공개 접근 가능한 URL
    pub url: String,
    /// 프로바이더 측 자산 식별자 (삭제 호출에 사용)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl MediaAsset {
    /// 기본 아바타 플레이스홀더
    pub fn default_avatar() -> Self {
        Self {
            url: "https://via.placeholder.com/200x200.png".to_string(),
            public_id: None,
        }
    }

    /// 기본 커버 이미지 플레이스홀더
    pub fn default_cover() -> Self {
        Self {
            url: "https://via.placeholder.com/1500x500".to_string(),
            public_id: None,
        }
    }
}

/// 계정 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
///
/// ## 토큰 필드 불변식
///
/// - `refresh_token`: 계정당 활성 리프레시 토큰은 최대 하나
/// - `email_verification_token` / `forgot_password_token`: 클라이언트에게
///   전달된 원문이 아니라 SHA-256 해시만 저장됩니다. 종류별로 살아있는
///   토큰은 최대 하나이며, 소비 시 해시와 만료 시각이 함께 제거됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자명 (unique, 소문자/공백 정규화)
    pub username: String,
    /// 표시 이름
    pub full_name: String,
    /// 이메일 (unique, 소문자/공백 정규화)
    pub email: String,
    /// bcrypt 해시된 비밀번호 (원문은 절대 저장되지 않음)
    pub password: String,
    /// 사용자 역할
    pub role: UserRole,
    /// 이메일 인증 여부
    pub is_email_verified: bool,
    /// 아바타 이미지
    pub avatar: MediaAsset,
    /// 현재 유효한 리프레시 토큰 (로그아웃 시 제거)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// 이메일 인증 토큰의 SHA-256 해시
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_token: Option<String>,
    /// 이메일 인증 토큰 만료 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verification_token_expiry: Option<DateTime>,
    /// 비밀번호 재설정 토큰의 SHA-256 해시
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forgot_password_token: Option<String>,
    /// 비밀번호 재설정 토큰 만료 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forgot_password_token_expiry: Option<DateTime>,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
}

impl Account {
    /// 새 계정 생성
    ///
    /// 이메일 인증이 필요한 상태(`is_email_verified = false`)로 시작하며,
    /// 아바타는 플레이스홀더로 초기화됩니다. 비밀번호는 이미 해시된 값이어야 합니다.
    pub fn new(
        username: String,
        full_name: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username,
            full_name,
            email,
            password: password_hash,
            role,
            is_email_verified: false,
            avatar: MediaAsset::default_avatar(),
            refresh_token: None,
            email_verification_token: None,
            email_verification_token_expiry: None,
            forgot_password_token: None,
            forgot_password_token_expiry: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 관리자 계정인지 확인
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_str() {
        assert_eq!(UserRole::from_str("user").unwrap(), UserRole::User);
        assert_eq!(UserRole::from_str("ADMIN").unwrap(), UserRole::Admin);
        assert!(UserRole::from_str("moderator").is_err());
    }

    #[test]
    fn test_user_role_serialization() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");

        let role: UserRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, UserRole::User);
    }

    #[test]
    fn test_new_account_starts_unverified() {
        let account = Account::new(
            "alice".to_string(),
            "Alice Kim".to_string(),
            "alice@example.com".to_string(),
            "$2b$12$hash".to_string(),
            UserRole::User,
        );

        assert!(!account.is_email_verified);
        assert!(account.refresh_token.is_none());
        assert!(account.email_verification_token.is_none());
        assert!(account.forgot_password_token.is_none());
        assert!(account.avatar.public_id.is_none());
        assert!(!account.is_admin());
    }
}

//! 계정 응답 DTO
//!
//! 엔티티에서 민감 정보(비밀번호 해시, 토큰류)를 제거한 응답 표현입니다.

use serde::Serialize;

use crate::domain::entities::accounts::account::{Account, MediaAsset, UserRole};

/// 외부로 노출되는 계정 표현
///
/// 비밀번호 해시, 리프레시 토큰, 일회용 토큰 해시/만료는 절대 포함되지 않습니다.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub is_email_verified: bool,
    pub avatar: MediaAsset,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id_string().unwrap_or_default(),
            username: account.username,
            full_name: account.full_name,
            email: account.email,
            role: account.role,
            is_email_verified: account.is_email_verified,
            avatar: account.avatar,
            created_at: account
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            updated_at: account
                .updated_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

/// 로그인/토큰 갱신 성공 응답
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: AccountResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl AuthResponse {
    pub fn new(account: AccountResponse, access_token: String, refresh_token: String) -> Self {
        Self {
            account,
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_response_strips_sensitive_fields() {
        let mut account = Account::new(
            "alice".to_string(),
            "Alice Kim".to_string(),
            "alice@example.com".to_string(),
            "$2b$12$hash".to_string(),
            UserRole::User,
        );
        account.refresh_token = Some("refresh.jwt.value".to_string());
        account.email_verification_token = Some("deadbeef".to_string());

        let response = AccountResponse::from(account);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password").is_none());
        assert!(json.get("refresh_token").is_none());
        assert!(json.get("email_verification_token").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "USER");
    }
}

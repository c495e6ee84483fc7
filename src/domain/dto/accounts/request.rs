//! 계정 생명주기 요청 DTO
//!
//! 모든 요청 본문은 핸들러 진입 직후 `validator`로 검증됩니다.
//! 식별자(이메일/사용자명)의 정규화는 서비스 계층에서 수행됩니다.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::accounts::account::UserRole;

/// 회원가입 요청
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// 사용자명 (시스템 전체에서 유니크)
    #[validate(length(min = 1, max = 20, message = "사용자명은 1-20자 사이여야 합니다"))]
    pub username: String,

    /// 표시 이름
    #[validate(length(min = 4, max = 50, message = "표시 이름은 4-50자 사이여야 합니다"))]
    pub full_name: String,

    /// 이메일 (시스템 전체에서 유니크)
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    /// 비밀번호 (평문, 서버에서 해싱됨)
    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub password: String,

    /// 역할 (생략 시 USER)
    pub role: Option<UserRole>,
}

/// 로그인 요청
///
/// `identifier`는 이메일 또는 사용자명 중 하나를 받습니다.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "이메일 또는 사용자명을 입력해주세요"))]
    pub identifier: String,

    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub password: String,
}

/// 토큰 갱신 요청
///
/// 리프레시 토큰은 본문 대신 `refreshToken` 쿠키로 전달될 수도 있습니다.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// 비밀번호 재설정 메일 요청
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
}

/// 비밀번호 재설정 실행 요청 (재설정 토큰과 함께 사용)
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub new_password: String,
}

/// 로그인 상태에서의 비밀번호 변경 요청
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 6, message = "현재 비밀번호는 최소 6자 이상이어야 합니다"))]
    pub current_password: String,

    #[validate(length(min = 6, message = "새 비밀번호는 최소 6자 이상이어야 합니다"))]
    pub new_password: String,
}

/// 역할 할당 요청 (관리자 전용)
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: UserRole,
}

/// 아바타 갱신 요청
///
/// 업로드는 스토리지 프로바이더로 직접 이루어지고,
/// 코어에는 결과 디스크립터 `{url, public_id}`만 전달됩니다.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAvatarRequest {
    #[validate(url(message = "유효한 URL 형식이 아닙니다"))]
    pub url: String,

    #[validate(length(min = 1, message = "public_id는 필수입니다"))]
    pub public_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "alice".to_string(),
            full_name: "Alice Kim".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            role: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            ..valid_request()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "abc".to_string(),
            ..valid_request()
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            identifier: String::new(),
            password: "secret1".to_string(),
        };
        assert!(request.validate().is_err());
    }

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            full_name: "Alice Kim".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            role: None,
        }
    }
}

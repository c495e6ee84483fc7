//! 일회용(ephemeral) 토큰 서비스 구현
//!
//! 이메일 인증과 비밀번호 재설정에 사용되는 단기 단일 사용 토큰을 발급합니다.
//!
//! 클라이언트에게는 암호학적으로 랜덤한 원문 토큰(UUID v4, 122비트 엔트로피)이
//! 전달되고, 저장소에는 그 SHA-256 해시와 절대 만료 시각만 기록됩니다.
//! 검증은 수신한 원문을 다시 해싱해 저장된 해시와 비교하는 방식으로만
//! 이루어지며, 원문은 어디에도 영속화되거나 로깅되지 않습니다.

use chrono::{Duration, Utc};
use mongodb::bson::DateTime;
use sha2::{Digest, Sha256};
use singleton_macro::service;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::domain::token::ephemeral::EphemeralToken;

/// 일회용 토큰 발급/해싱 서비스
///
/// 이메일 인증용과 비밀번호 재설정용 두 용도가 같은 메커니즘을 공유하지만,
/// 계정의 서로 다른 필드에 저장되어 교차 검증되지 않습니다. 이 서비스는
/// 값 계산만 담당하고 영속화는 호출 측(계정 서비스)이 수행합니다.
#[service(name = "ephemeral")]
pub struct EphemeralTokenService {
    // 외부 의존성 없음
}

impl EphemeralTokenService {
    /// 새 일회용 토큰을 발급합니다.
    ///
    /// # 반환값
    ///
    /// * `client_token` - 메일 링크로 전달할 원문 토큰
    /// * `stored_hash` - 계정 문서에 저장할 SHA-256 해시
    /// * `expires_at` - 현재 시각 + 설정된 TTL (기본 20분)
    pub fn issue(&self) -> EphemeralToken {
        let ttl_minutes = AppConfig::get().ephemeral_token.ttl_minutes;

        let client_token = Uuid::new_v4().to_string();
        let stored_hash = self.hash_client_token(&client_token);

        let expires_at = Utc::now() + Duration::minutes(ttl_minutes);

        EphemeralToken {
            client_token,
            stored_hash,
            expires_at: DateTime::from_millis(expires_at.timestamp_millis()),
        }
    }

    /// 원문 토큰의 저장용 해시를 계산합니다.
    ///
    /// 검증 경로에서 수신한 원문을 같은 방식으로 해싱하여
    /// 저장된 값과 비교할 때 사용합니다. 소문자 16진수를 반환합니다.
    pub fn hash_client_token(&self, client_token: &str) -> String {
        let digest = Sha256::digest(client_token.as_bytes());
        digest.iter().map(|byte| format!("{:02x}", byte)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_returns_hash_of_client_token() {
        let service = EphemeralTokenService::instance();

        let token = service.issue();

        assert_eq!(token.stored_hash, service.hash_client_token(&token.client_token));
        assert_ne!(token.stored_hash, token.client_token);
        // SHA-256 소문자 16진수
        assert_eq!(token.stored_hash.len(), 64);
        assert!(token.stored_hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let service = EphemeralTokenService::instance();

        let first = service.hash_client_token("some-token");
        let second = service.hash_client_token("some-token");

        assert_eq!(first, second);
        assert_ne!(first, service.hash_client_token("other-token"));
    }

    #[test]
    fn test_issued_tokens_are_unique() {
        let service = EphemeralTokenService::instance();

        let first = service.issue();
        let second = service.issue();

        assert_ne!(first.client_token, second.client_token);
        assert_ne!(first.stored_hash, second.stored_hash);
    }

    #[test]
    fn test_expiry_respects_configured_ttl() {
        let service = EphemeralTokenService::instance();
        let ttl_minutes = AppConfig::get().ephemeral_token.ttl_minutes;

        let token = service.issue();
        let expected = Utc::now() + Duration::minutes(ttl_minutes);
        let delta = expected.timestamp_millis() - token.expires_at.timestamp_millis();

        // 발급과 검증 사이의 시계 오차만 허용
        assert!(delta.abs() < 5_000, "expiry drifted by {}ms", delta);
        assert!(!token.is_expired_at(DateTime::now()));
    }

    #[test]
    fn test_is_expired_at_boundary() {
        let service = EphemeralTokenService::instance();
        let token = service.issue();

        assert!(token.is_expired_at(token.expires_at));

        let after = DateTime::from_millis(token.expires_at.timestamp_millis() + 1);
        assert!(token.is_expired_at(after));
    }
}

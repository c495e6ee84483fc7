//! 비밀번호 자격 증명 서비스 구현
//!
//! bcrypt 기반의 비밀번호 해싱과 검증을 담당합니다.
//! 솔트는 bcrypt가 자동 생성하며, cost는 실행 환경별 설정을 따릅니다.

use singleton_macro::service;

use crate::config::AppConfig;
use crate::core::errors::AppError;

/// 비밀번호 해싱/검증 서비스
///
/// ## 해싱 계약
///
/// `hash`는 비밀번호가 실제로 바뀌는 지점(회원가입, 재설정, 변경)에서만
/// 호출되어야 합니다. 계정의 다른 필드를 갱신하는 경로는 부분 `$set`
/// 문서를 사용하므로 저장된 해시를 다시 해싱하는 일이 없습니다.
///
/// ## 동시성
///
/// 상태가 없는 CPU 연산이므로 서로 다른 계정에 대해 동시에 호출해도
/// 안전합니다.
#[service(name = "credential")]
pub struct CredentialService {
    // 외부 의존성 없음
}

impl CredentialService {
    /// 평문 비밀번호를 bcrypt로 해싱합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - bcrypt 해싱 실패
    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let cost = AppConfig::get().password.bcrypt_cost;

        let start = std::time::Instant::now();
        let hashed = bcrypt::hash(plaintext, cost)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
        log::debug!("Password hashing took: {:?}", start.elapsed());

        Ok(hashed)
    }

    /// 평문 비밀번호를 저장된 해시와 대조합니다.
    ///
    /// 저장된 해시가 깨져 있는 등 검증 자체가 불가능한 경우에도
    /// 에러를 던지지 않고 `false`를 반환합니다. 실패 사유를 클라이언트에
    /// 구분해서 노출할 이유가 없기 때문입니다.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        let start = std::time::Instant::now();
        let is_valid = bcrypt::verify(plaintext, hashed).unwrap_or(false);
        log::debug!("Password verification took: {:?}", start.elapsed());

        is_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let service = CredentialService::instance();

        let hashed = service.hash("secret1").unwrap();
        assert_ne!(hashed, "secret1");
        assert!(service.verify("secret1", &hashed));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let service = CredentialService::instance();

        let hashed = service.hash("secret1").unwrap();
        assert!(!service.verify("secret2", &hashed));
    }

    #[test]
    fn test_verify_tolerates_malformed_hash() {
        let service = CredentialService::instance();

        assert!(!service.verify("secret1", "not-a-bcrypt-hash"));
        assert!(!service.verify("secret1", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = CredentialService::instance();

        let first = service.hash("secret1").unwrap();
        let second = service.hash("secret1").unwrap();
        assert_ne!(first, second);
    }
}

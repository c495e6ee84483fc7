//! JWT 토큰 관리 서비스 구현
//!
//! JSON Web Token 기반의 인증 시스템을 제공합니다.
//! 액세스 토큰과 리프레시 토큰의 생성과 검증을 담당합니다.
//!
//! 두 토큰은 서로 다른 비밀키로 서명되며, 검증 시 알고리즘을 HS256으로
//! 고정하여 alg 다운그레이드 공격을 차단합니다. 액세스 검증기로 리프레시
//! 토큰을 검증하면(또는 그 반대) 서명 불일치로 실패합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;

use crate::config::AppConfig;
use crate::core::errors::AppError;
use crate::domain::entities::accounts::account::Account;
use crate::domain::token::token::{AccessTokenClaims, RefreshTokenClaims, TokenError, TokenPair};

/// JWT 토큰 관리 서비스
///
/// HMAC-SHA256 서명을 사용하여 액세스 토큰(분 단위 만료)과
/// 리프레시 토큰(일 단위 만료)을 생성하고 검증합니다.
#[service(name = "token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    /// 계정을 위한 JWT 액세스 토큰 생성
    ///
    /// 클레임: `{sub, username, full_name, email, iat, exp}`
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 토큰 생성 실패 또는 계정 ID 없음
    pub fn issue_access_token(&self, account: &Account) -> Result<String, AppError> {
        let config = AppConfig::get();
        let now = Utc::now();
        let expiration = now + Duration::minutes(config.jwt.access_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: account.id_string().ok_or_else(|| {
                AppError::InternalError("계정 ID가 없습니다".to_string())
            })?,
            username: account.username.clone(),
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let header = Header::default();
        let encoding_key = EncodingKey::from_secret(config.jwt.access_secret.as_ref());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// 계정을 위한 리프레시 토큰 생성
    ///
    /// 클레임은 계정 ID만 포함합니다 (`{sub, iat, exp}`).
    /// 리프레시 토큰은 Secure HttpOnly Cookie에 저장하는 것을 권장합니다.
    pub fn issue_refresh_token(&self, account: &Account) -> Result<String, AppError> {
        let config = AppConfig::get();
        let now = Utc::now();
        let expiration = now + Duration::days(config.jwt.refresh_expiry_days);

        let claims = RefreshTokenClaims {
            sub: account.id_string().ok_or_else(|| {
                AppError::InternalError("계정 ID가 없습니다".to_string())
            })?,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let header = Header::default();
        let encoding_key = EncodingKey::from_secret(config.jwt.refresh_secret.as_ref());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("리프레시 토큰 생성 실패: {}", e)))
    }

    /// 토큰 쌍 생성 (액세스 + 리프레시)
    pub fn issue_token_pair(&self, account: &Account) -> Result<TokenPair, AppError> {
        let access_token = self.issue_access_token(account)?;
        let refresh_token = self.issue_refresh_token(account)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// 액세스 토큰 검증 및 클레임 추출
    ///
    /// # Errors
    ///
    /// * [`TokenError::Expired`] - 만료된 토큰
    /// * [`TokenError::SignatureInvalid`] - 서명/알고리즘 불일치
    /// * [`TokenError::Malformed`] - 깨진 토큰 또는 기대하지 않은 클레임 형태
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let config = AppConfig::get();
        let decoding_key = DecodingKey::from_secret(config.jwt.access_secret.as_ref());
        let validation = Validation::new(Algorithm::HS256);

        decode::<AccessTokenClaims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(map_jwt_error)
    }

    /// 리프레시 토큰 검증 및 클레임 추출
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims, TokenError> {
        let config = AppConfig::get();
        let decoding_key = DecodingKey::from_secret(config.jwt.refresh_secret.as_ref());
        let validation = Validation::new(Algorithm::HS256);

        decode::<RefreshTokenClaims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(map_jwt_error)
    }

    /// Bearer 토큰에서 실제 토큰 부분 추출
    ///
    /// HTTP Authorization 헤더의 "Bearer {token}" 형식에서 토큰 부분만을 추출합니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        if auth_header.starts_with("Bearer ") {
            Ok(&auth_header[7..])
        } else {
            Err(AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string()))
        }
    }
}

/// jsonwebtoken 에러를 도메인 [`TokenError`]로 매핑합니다.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
        _ => TokenError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use serde::Serialize;

    use crate::domain::entities::accounts::account::UserRole;

    fn account_fixture() -> Account {
        let mut account = Account::new(
            "alice".to_string(),
            "Alice Kim".to_string(),
            "alice@example.com".to_string(),
            "$2b$04$hash".to_string(),
            UserRole::User,
        );
        account.id = Some(ObjectId::new());
        account
    }

    #[test]
    fn test_access_token_roundtrip() {
        let service = TokenService::instance();
        let account = account_fixture();

        let token = service.issue_access_token(&account).unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, account.id_string().unwrap());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let service = TokenService::instance();
        let account = account_fixture();

        let token = service.issue_refresh_token(&account).unwrap();
        let claims = service.verify_refresh_token(&token).unwrap();

        assert_eq!(claims.sub, account.id_string().unwrap());
    }

    #[test]
    fn test_issue_without_id_fails() {
        let service = TokenService::instance();
        let account = Account::new(
            "bob".to_string(),
            "Bob Lee".to_string(),
            "bob@example.com".to_string(),
            "$2b$04$hash".to_string(),
            UserRole::User,
        );

        assert!(service.issue_access_token(&account).is_err());
    }

    #[test]
    fn test_cross_kind_verification_fails_as_signature_invalid() {
        // 리프레시 토큰을 액세스 검증기에 넣으면 비밀키가 달라 서명 불일치
        let service = TokenService::instance();
        let account = account_fixture();

        let refresh = service.issue_refresh_token(&account).unwrap();
        let result = service.verify_access_token(&refresh);

        assert_eq!(result.unwrap_err(), TokenError::SignatureInvalid);
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let service = TokenService::instance();

        assert_eq!(
            service.verify_access_token("definitely.not.a-jwt").unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::instance();
        let account = account_fixture();
        let config = AppConfig::get();

        // 검증 leeway(기본 60초)를 확실히 넘긴 과거 만료 토큰을 직접 서명한다
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: account.id_string().unwrap(),
            username: account.username.clone(),
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt.access_secret.as_ref()),
        )
        .unwrap();

        assert_eq!(
            service.verify_access_token(&token).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_token_missing_sub_is_malformed() {
        // 기대한 클레임 형태가 아닌 토큰은 Malformed로 거부된다
        #[derive(Serialize)]
        struct BareClaims {
            iat: i64,
            exp: i64,
        }

        let service = TokenService::instance();
        let config = AppConfig::get();

        let now = Utc::now();
        let claims = BareClaims {
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt.access_secret.as_ref()),
        )
        .unwrap();

        assert_eq!(
            service.verify_access_token(&token).unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = TokenService::instance();

        assert_eq!(service.extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(service.extract_bearer_token("Basic abc").is_err());
    }
}

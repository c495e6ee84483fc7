//! JWT 인증 토큰 클레임 및 토큰 쌍
//!
//! RFC 7519 JWT 표준 클레임과 2개의 용도별 토큰 구조를 정의합니다.
//! 액세스 토큰과 리프레시 토큰은 클레임 구성과 서명 비밀키가 서로 다릅니다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::errors::AppError;

/// 액세스 토큰의 클레임(Payload) 구조체
///
/// API 호출 인가에 필요한 최소한의 계정 정보를 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// 토큰의 주체 (계정 ID, ObjectId 16진수 문자열)
    pub sub: String,
    /// 사용자명
    pub username: String,
    /// 표시 이름
    pub full_name: String,
    /// 이메일
    pub email: String,
    /// 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// 리프레시 토큰의 클레임 구조체
///
/// 토큰 갱신에만 사용되므로 계정 ID 외의 정보는 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// 토큰의 주체 (계정 ID)
    pub sub: String,
    /// 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// 클라이언트에게 전달되는 (액세스, 리프레시) 토큰 쌍
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// 액세스 토큰 (API 접근용 단기 토큰)
    pub access_token: String,
    /// 리프레시 토큰 (토큰 갱신용 장기 토큰)
    pub refresh_token: String,
}

/// JWT 검증 실패 사유
///
/// 검증 경로에서는 사유를 구분해 다루고, 서비스 경계에서
/// [`AppError::AuthenticationError`]로 정규화됩니다.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// 구조가 깨졌거나 기대한 클레임 형태가 아닌 토큰
    #[error("malformed token")]
    Malformed,
    /// 만료된 토큰
    #[error("expired token")]
    Expired,
    /// 서명 또는 알고리즘이 일치하지 않는 토큰
    #[error("invalid token signature")]
    SignatureInvalid,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        let message = match err {
            TokenError::Malformed => "유효하지 않은 토큰입니다",
            TokenError::Expired => "토큰이 만료되었습니다",
            TokenError::SignatureInvalid => "토큰 서명이 유효하지 않습니다",
        };
        AppError::AuthenticationError(message.to_string())
    }
}

//! 인증 및 보안 서비스 모듈
//!
//! 자격 증명(비밀번호), JWT 토큰, 일회용 토큰, 세션/리프레시 조정을
//! 담당하는 서비스들을 제공합니다.
//!
//! # Security
//!
//! - HMAC-SHA256 토큰 서명 (액세스/리프레시 비밀키 분리, 알고리즘 고정)
//! - bcrypt 비밀번호 해싱
//! - 일회용 토큰은 SHA-256 해시만 영속화
//! - 계정당 단일 활성 리프레시 토큰

pub mod credential_service;
pub mod ephemeral_token_service;
pub mod session_service;
pub mod token_service;

pub use credential_service::*;
pub use ephemeral_token_service::*;
pub use session_service::*;
pub use token_service::*;

//! 인증된 사용자 추출자
//!
//! 인증 미들웨어가 Request Extensions에 저장한 사용자 정보를
//! 핸들러 시그니처에서 바로 꺼내 쓸 수 있게 하는 추출자들입니다.

use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::entities::accounts::account::{Account, UserRole};

/// 인증 미들웨어가 확정한 요청자 신원
///
/// 액세스 토큰 검증 후 저장소에서 로드된 계정을 바탕으로 구성됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 계정 고유 ID (ObjectId 16진수 문자열)
    pub user_id: String,
    /// 사용자명
    pub username: String,
    /// 역할
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// 관리자 권한을 보유하고 있는지 확인
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&Account> for AuthenticatedUser {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.id_string().unwrap_or_default(),
            username: account.username.clone(),
            role: account.role,
        }
    }
}

/// ActixWeb FromRequest trait 구현
///
/// 필수 인증 미들웨어가 걸린 라우트에서 사용합니다.
/// Extensions에 사용자 정보가 없으면 401을 반환합니다.
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "인증되지 않은 요청입니다"
            ))),
        }
    }
}

/// 선택적 인증 사용자 추출자
///
/// soft 인증 라우트(공개지만 개인화 가능한 엔드포인트)에서 사용합니다.
/// 인증 실패 여부와 무관하게 항상 성공하며, 익명 요청이면 `None`을 담습니다.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

//! 세션/리프레시 토큰 조정 서비스 구현
//!
//! (액세스, 리프레시) 토큰 쌍의 회전과 재발급 검증을 담당합니다.
//! 계정당 활성 리프레시 토큰은 항상 하나이며, 회전 시 이전 값은
//! 즉시 무효화됩니다 (토큰 패밀리/회전 체인 없음).
//!
//! ## 동시성에 대한 메모
//!
//! 저장된 리프레시 토큰 교체에는 비교-교환이 없습니다. 같은 계정의
//! 두 회전 요청이 경합하면 마지막 쓰기가 이기고, 먼저 발급된 쌍의
//! 리프레시 토큰은 다음 재발급 시도에서 불일치로 거부됩니다.

use std::sync::Arc;
use actix_web::cookie::{time, Cookie, SameSite};
use singleton_macro::service;

use crate::config::AppConfig;
use crate::core::errors::AppError;
use crate::domain::token::token::TokenPair;
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::services::auth::token_service::TokenService;

/// 액세스 토큰 쿠키 이름
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// 리프레시 토큰 쿠키 이름
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// 세션/리프레시 토큰 조정 서비스
#[service(name = "session")]
pub struct SessionService {
    /// 계정 데이터 액세스 리포지토리 (자동 주입)
    account_repo: Arc<AccountRepository>,
}

impl SessionService {
    /// 새 (액세스, 리프레시) 쌍을 발급하고 리프레시 토큰을
    /// 계정의 유일한 활성 값으로 영속화합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 계정 ID가 더 이상 존재하지 않는 경우
    pub async fn rotate(&self, account_id: &str) -> Result<TokenPair, AppError> {
        let account = self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        let token_service = TokenService::instance();
        let pair = token_service.issue_token_pair(&account)?;

        self.account_repo
            .set_refresh_token(account_id, Some(&pair.refresh_token))
            .await?;

        log::debug!("리프레시 토큰 회전 완료 - account_id: {}", account_id);

        Ok(pair)
    }

    /// 수신한 리프레시 토큰을 검증하고 새 토큰 쌍으로 교환합니다.
    ///
    /// 1. 서명/만료를 Token Issuer로 검증
    /// 2. 클레임의 계정을 로드
    /// 3. 저장된 리프레시 토큰과 **문자열 완전 일치** 요구
    /// 4. 일치하면 회전하여 새 쌍 반환
    ///
    /// 구조적으로 유효하지만 이미 대체된 토큰도 불일치로 거부됩니다.
    /// 재사용(replay) 신호이므로 조용히 성공시키지 않습니다.
    pub async fn reconcile(&self, incoming_refresh_token: &str) -> Result<TokenPair, AppError> {
        let token_service = TokenService::instance();

        let claims = token_service
            .verify_refresh_token(incoming_refresh_token)
            .map_err(AppError::from)?;

        let account = self.account_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::AuthenticationError("유효하지 않은 리프레시 토큰입니다".to_string())
            })?;

        let stored = account.refresh_token.as_deref().unwrap_or_default();
        if stored != incoming_refresh_token {
            log::warn!(
                "리프레시 토큰 불일치 감지 - account_id: {} (재사용이거나 이미 대체된 토큰)",
                claims.sub
            );
            return Err(AppError::AuthenticationError(
                "리프레시 토큰이 일치하지 않습니다. 다시 로그인해주세요".to_string(),
            ));
        }

        self.rotate(&claims.sub).await
    }

    /// 저장된 리프레시 토큰을 무조건 제거합니다 (로그아웃).
    pub async fn logout(&self, account_id: &str) -> Result<(), AppError> {
        self.account_repo
            .set_refresh_token(account_id, None)
            .await?;

        log::info!("로그아웃 처리 완료 - account_id: {}", account_id);
        Ok(())
    }
}

/// 토큰 쌍을 담는 인증 쿠키들을 생성합니다.
///
/// 두 쿠키 모두 `HttpOnly` + `SameSite=Strict`, 경로 `/`,
/// 설정된 고정 수명으로 발급됩니다.
pub fn auth_cookies(pair: &TokenPair) -> (Cookie<'static>, Cookie<'static>) {
    let config = AppConfig::get();
    let max_age = time::Duration::seconds(config.cookies.max_age_seconds);

    (
        build_auth_cookie(ACCESS_TOKEN_COOKIE, pair.access_token.clone(), max_age),
        build_auth_cookie(REFRESH_TOKEN_COOKIE, pair.refresh_token.clone(), max_age),
    )
}

/// 인증 쿠키들을 만료시키는 제거용 쿠키들을 생성합니다.
pub fn clearing_cookies() -> (Cookie<'static>, Cookie<'static>) {
    (
        build_auth_cookie(ACCESS_TOKEN_COOKIE, String::new(), time::Duration::ZERO),
        build_auth_cookie(REFRESH_TOKEN_COOKIE, String::new(), time::Duration::ZERO),
    )
}

fn build_auth_cookie(name: &'static str, value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build(name, value)
        .http_only(true)
        .secure(AppConfig::get().cookies.secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_fixture() -> TokenPair {
        TokenPair {
            access_token: "access.jwt.value".to_string(),
            refresh_token: "refresh.jwt.value".to_string(),
        }
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let (access, refresh) = auth_cookies(&pair_fixture());
        let expected_age = time::Duration::seconds(AppConfig::get().cookies.max_age_seconds);

        assert_eq!(access.name(), "accessToken");
        assert_eq!(refresh.name(), "refreshToken");
        assert_eq!(access.value(), "access.jwt.value");
        assert_eq!(refresh.value(), "refresh.jwt.value");

        for cookie in [&access, &refresh] {
            assert_eq!(cookie.http_only(), Some(true));
            assert_eq!(cookie.same_site(), Some(SameSite::Strict));
            assert_eq!(cookie.path(), Some("/"));
            assert_eq!(cookie.max_age(), Some(expected_age));
        }
    }

    #[test]
    fn test_clearing_cookies_expire_immediately() {
        let (access, refresh) = clearing_cookies();

        for cookie in [&access, &refresh] {
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
            assert_eq!(cookie.http_only(), Some(true));
        }
    }
}

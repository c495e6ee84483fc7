//! # 계정 생명주기 서비스 구현
//!
//! 회원가입, 로그인, 이메일 인증, 비밀번호 재설정/변경, 역할 할당,
//! 아바타 갱신까지 계정의 전체 생명주기를 관리하는 비즈니스 로직입니다.
//!
//! ## 토큰 취급 원칙
//!
//! - 일회용 토큰의 원문은 메일 링크로만 전달되고 로그에 남지 않습니다.
//! - 토큰 값 계산(Token Issuer / Ephemeral Token Manager)과 영속화는
//!   분리되어 있으며, 이 서비스가 계산 결과를 계정 문서에 부착해
//!   한 번의 저장으로 반영합니다.
//! - 비밀번호 해싱은 값이 실제로 바뀌는 세 지점(가입/재설정/변경)에서만
//!   수행됩니다.

use std::sync::Arc;
use mongodb::bson::doc;
use singleton_macro::service;

use crate::core::errors::AppError;
use crate::domain::dto::accounts::request::{RegisterRequest, UpdateAvatarRequest};
use crate::domain::dto::accounts::response::AccountResponse;
use crate::domain::entities::accounts::account::{Account, MediaAsset, UserRole};
use crate::domain::entities::profiles::profile::Profile;
use crate::domain::token::token::TokenPair;
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::repositories::profiles::profile_repo::ProfileRepository;
use crate::services::auth::credential_service::CredentialService;
use crate::services::auth::ephemeral_token_service::EphemeralTokenService;
use crate::services::auth::session_service::SessionService;
use crate::services::mail::mail_service::MailService;
use crate::services::media::storage_service::MediaStorageService;
use crate::utils::string_utils::normalize_identifier;

/// 계정 생명주기 비즈니스 로직 서비스
#[service(name = "account")]
pub struct AccountService {
    /// 계정 데이터 액세스 리포지토리 (자동 주입)
    account_repo: Arc<AccountRepository>,

    /// 프로필 데이터 액세스 리포지토리 (자동 주입)
    ///
    /// 프로필은 회원가입 시 계정과 함께 생성되어 1:1 생명주기를 가집니다.
    profile_repo: Arc<ProfileRepository>,
}

impl AccountService {
    /// 새 계정 등록
    ///
    /// # 처리 과정
    ///
    /// 1. 사용자명/이메일 정규화 (소문자, 공백 제거)
    /// 2. 비밀번호 해싱 (이 지점에서 정확히 한 번)
    /// 3. 이메일 인증 토큰 발급 후 해시+만료를 계정에 부착
    /// 4. 계정 저장 (중복 이메일/사용자명은 `ConflictError`)
    /// 5. 빈 프로필 생성
    /// 6. 인증 메일 발송 (실패해도 요청은 성공)
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이메일 또는 사용자명 중복
    pub async fn register(&self, request: RegisterRequest) -> Result<AccountResponse, AppError> {
        let username = normalize_identifier(&request.username);
        let email = normalize_identifier(&request.email);

        let credential_service = CredentialService::instance();
        let password_hash = credential_service.hash(&request.password)?;

        let mut account = Account::new(
            username,
            request.full_name.trim().to_string(),
            email,
            password_hash,
            request.role.unwrap_or(UserRole::User),
        );

        // 인증 토큰의 해시/만료를 부착한 뒤 한 번의 저장으로 반영한다
        let ephemeral_service = EphemeralTokenService::instance();
        let verification = ephemeral_service.issue();
        account.email_verification_token = Some(verification.stored_hash.clone());
        account.email_verification_token_expiry = Some(verification.expires_at);

        let account = self.account_repo.create(account).await?;

        let owner = account.id.ok_or_else(|| {
            AppError::InternalError("생성된 계정에 ID가 없습니다".to_string())
        })?;
        self.profile_repo.create(Profile::new_for(owner)).await?;

        log::info!("계정 생성 완료 - username: {}", account.username);

        // 메일 발송 실패는 요청 실패로 이어지지 않는다
        MailService::instance()
            .send_verification_email(&account, &verification.client_token)
            .await;

        Ok(AccountResponse::from(account))
    }

    /// 로그인
    ///
    /// `identifier`는 이메일 또는 사용자명입니다. 인증 성공 시 토큰 쌍을
    /// 회전 발급하여 반환합니다. 실패 경로에서는 쿠키가 설정되지 않습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 계정 없음
    /// * `AppError::AuthenticationError` - 비밀번호 불일치
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(AccountResponse, TokenPair), AppError> {
        let identifier = normalize_identifier(identifier);

        let account = self.account_repo
            .find_by_identifier(&identifier)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        let credential_service = CredentialService::instance();
        if !credential_service.verify(password, &account.password) {
            return Err(AppError::AuthenticationError(
                "비밀번호가 올바르지 않습니다".to_string(),
            ));
        }

        let account_id = account.id_string().ok_or_else(|| {
            AppError::InternalError("계정 ID가 없습니다".to_string())
        })?;

        let pair = SessionService::instance().rotate(&account_id).await?;

        log::info!("로그인 성공 - username: {}", account.username);

        Ok((AccountResponse::from(account), pair))
    }

    /// 이메일 인증 토큰 소비
    ///
    /// 수신한 원문 토큰을 해싱해 살아있는(만료 전) 해시와 대조합니다.
    /// 성공 시 해시/만료 제거와 인증 플래그 설정이 한 번의 갱신으로
    /// 이루어지므로, 같은 토큰의 두 번째 제시는 반드시 실패합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenInvalidOrExpired` - 소비되었거나 만료되었거나 알 수 없는 토큰
    pub async fn verify_email(&self, client_token: &str) -> Result<(), AppError> {
        let token_hash = EphemeralTokenService::instance().hash_client_token(client_token);

        let account = self.account_repo
            .find_by_live_email_verification_token(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::TokenInvalidOrExpired("토큰이 유효하지 않거나 만료되었습니다".to_string())
            })?;

        let account_id = account.id_string().ok_or_else(|| {
            AppError::InternalError("계정 ID가 없습니다".to_string())
        })?;

        self.account_repo.consume_email_verification(&account_id).await?;

        log::info!("이메일 인증 완료 - username: {}", account.username);
        Ok(())
    }

    /// 이메일 인증 메일 재발송
    ///
    /// 로그인된 사용자가 인증 메일을 받지 못했거나 토큰이 만료된 경우
    /// 사용합니다. 새 토큰이 기존 토큰을 대체합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 이미 인증된 이메일
    pub async fn resend_verification(&self, account_id: &str) -> Result<(), AppError> {
        let account = self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        if account.is_email_verified {
            return Err(AppError::ValidationError("이미 인증된 이메일입니다".to_string()));
        }

        let verification = EphemeralTokenService::instance().issue();

        let account = self.account_repo
            .update(account_id, doc! {
                "email_verification_token": verification.stored_hash.clone(),
                "email_verification_token_expiry": verification.expires_at,
            })
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        MailService::instance()
            .send_verification_email(&account, &verification.client_token)
            .await;

        Ok(())
    }

    /// 비밀번호 재설정 메일 요청
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 해당 이메일의 계정 없음
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_identifier(email);

        let account = self.account_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("해당 이메일의 계정이 존재하지 않습니다".to_string())
            })?;

        let account_id = account.id_string().ok_or_else(|| {
            AppError::InternalError("계정 ID가 없습니다".to_string())
        })?;

        let reset = EphemeralTokenService::instance().issue();

        let account = self.account_repo
            .update(&account_id, doc! {
                "forgot_password_token": reset.stored_hash.clone(),
                "forgot_password_token_expiry": reset.expires_at,
            })
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        MailService::instance()
            .send_password_reset_email(&account, &reset.client_token)
            .await;

        Ok(())
    }

    /// 재설정 토큰으로 비밀번호 변경
    ///
    /// 토큰 소비와 새 해시 저장이 한 번의 갱신으로 이루어집니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenInvalidOrExpired` - 소비되었거나 만료되었거나 알 수 없는 토큰
    pub async fn reset_password(
        &self,
        client_token: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let token_hash = EphemeralTokenService::instance().hash_client_token(client_token);

        let account = self.account_repo
            .find_by_live_forgot_password_token(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::TokenInvalidOrExpired("재설정 토큰이 유효하지 않거나 만료되었습니다".to_string())
            })?;

        let account_id = account.id_string().ok_or_else(|| {
            AppError::InternalError("계정 ID가 없습니다".to_string())
        })?;

        let new_hash = CredentialService::instance().hash(new_password)?;
        self.account_repo
            .consume_forgot_password(&account_id, &new_hash)
            .await?;

        log::info!("비밀번호 재설정 완료 - username: {}", account.username);
        Ok(())
    }

    /// 로그인 상태에서의 비밀번호 변경
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 새 비밀번호가 현재 비밀번호와 동일
    /// * `AppError::AuthenticationError` - 현재 비밀번호 불일치
    pub async fn change_password(
        &self,
        account_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if current_password == new_password {
            return Err(AppError::ValidationError(
                "새 비밀번호는 현재 비밀번호와 달라야 합니다".to_string(),
            ));
        }

        let account = self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        let credential_service = CredentialService::instance();
        if !credential_service.verify(current_password, &account.password) {
            return Err(AppError::AuthenticationError(
                "현재 비밀번호가 올바르지 않습니다".to_string(),
            ));
        }

        let new_hash = credential_service.hash(new_password)?;
        self.account_repo
            .update(account_id, doc! { "password": new_hash })
            .await?;

        log::info!("비밀번호 변경 완료 - account_id: {}", account_id);
        Ok(())
    }

    /// 역할 할당 (관리자 전용 경로에서 호출)
    pub async fn assign_role(&self, target_id: &str, role: UserRole) -> Result<(), AppError> {
        let updated = self.account_repo
            .update(target_id, doc! { "role": role.as_str() })
            .await?;

        if updated.is_none() {
            return Err(AppError::NotFound("계정을 찾을 수 없습니다".to_string()));
        }

        log::info!("역할 할당 완료 - account_id: {}, role: {}", target_id, role.as_str());
        Ok(())
    }

    /// 현재 계정 조회 (`GET /me`)
    pub async fn current_account(&self, account_id: &str) -> Result<AccountResponse, AppError> {
        let account = self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        Ok(AccountResponse::from(account))
    }

    /// 아바타 교체
    ///
    /// 업로드 결과 디스크립터를 저장하고, 교체되는 이전 자산은
    /// 미디어 게이트웨이에 best-effort로 삭제 요청합니다.
    pub async fn update_avatar(
        &self,
        account_id: &str,
        request: UpdateAvatarRequest,
    ) -> Result<AccountResponse, AppError> {
        let account = self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        if let Some(previous) = account.avatar.public_id.as_deref() {
            MediaStorageService::instance().delete(previous).await;
        }

        let avatar = MediaAsset {
            url: request.url,
            public_id: Some(request.public_id),
        };
        let avatar_bson = mongodb::bson::to_bson(&avatar)
            .map_err(|e| AppError::InternalError(format!("아바타 직렬화 실패: {}", e)))?;

        let updated = self.account_repo
            .update(account_id, doc! { "avatar": avatar_bson })
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))?;

        Ok(AccountResponse::from(updated))
    }
}

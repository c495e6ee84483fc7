//! # 계정 리포지토리 구현
//!
//! 계정 엔티티의 데이터 액세스 계층입니다.
//! MongoDB를 주 저장소로 사용하고, Redis를 통한 read-through 캐싱을 지원합니다.
//!
//! ## 캐싱 전략
//!
//! - **캐시 키**: 개별 계정 `account:{id}`, 이메일 조회 `account:email:{email}`
//! - **TTL**: 600초 (10분)
//! - **쓰기 경로**: 갱신 성공 시 해당 계정의 모든 캐시 키 무효화
//!
//! 일회용 토큰 조회(`find_by_live_*`)와 리프레시 토큰 비교 경로는
//! 일관성이 우선이므로 캐시를 거치지 않고 항상 MongoDB를 조회합니다.

use std::sync::Arc;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime, Document},
    options::IndexOptions,
    IndexModel,
};
use singleton_macro::repository;
use crate::{
    caching::redis::RedisClient,
    core::errors::AppError,
    core::registry::Repository,
    db::Database,
    domain::entities::accounts::account::Account,
};

/// 캐시 TTL (초)
const ACCOUNT_CACHE_TTL_SECONDS: usize = 600;

/// 계정 데이터 액세스 리포지토리
///
/// 계정 엔티티의 CRUD 연산과 토큰 관련 조회를 담당하며,
/// MongoDB 컬렉션과 Redis 캐시를 통합하여 최적화된 데이터 액세스를 제공합니다.
#[repository(name = "account", collection = "accounts")]
pub struct AccountRepository {
    /// MongoDB 데이터베이스 연결 (자동 주입)
    db: Arc<Database>,

    /// Redis 캐시 클라이언트 (자동 주입)
    redis: Arc<RedisClient>,
}

impl AccountRepository {
    /// 이메일 주소로 계정 조회
    ///
    /// 캐시 우선 조회를 통해 성능을 최적화합니다. 이메일은 호출 전에
    /// 정규화(소문자/trim)되어 있어야 합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(Account))` - 계정을 찾은 경우
    /// * `Ok(None)` - 해당 이메일의 계정이 없는 경우
    /// * `Err(AppError)` - 데이터베이스 오류
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let cache_key = Self::email_cache_key(email);

        if let Ok(Some(cached)) = self.redis.get::<Account>(&cache_key).await {
            return Ok(Some(cached));
        }

        let account = self.collection::<Account>()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref account) = account {
            let _ = self.redis
                .set_with_expiry(&cache_key, account, ACCOUNT_CACHE_TTL_SECONDS)
                .await;
        }

        Ok(account)
    }

    /// 사용자명으로 계정 조회
    ///
    /// 사용자명은 시스템 전체에서 유니크하므로 최대 1개의 결과만 반환됩니다.
    /// 상대적으로 빈도가 낮은 조회라 캐싱하지 않습니다.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        self.collection::<Account>()
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 이메일 또는 사용자명으로 계정 조회 (로그인 식별자)
    ///
    /// 로그인 요청의 `identifier` 필드 하나로 두 유니크 필드를 함께 검색합니다.
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AppError> {
        self.collection::<Account>()
            .find_one(doc! {
                "$or": [
                    { "email": identifier },
                    { "username": identifier },
                ]
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// ID로 계정 조회
    ///
    /// 가장 빈번한 조회 패턴이므로 적극적인 캐싱을 적용합니다.
    ///
    /// # 반환값
    ///
    /// * `Err(AppError::ValidationError)` - 잘못된 ObjectId 형식
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Account>(&cache_key).await {
            return Ok(Some(cached));
        }

        let account = self.collection::<Account>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref account) = account {
            let _ = self.redis
                .set_with_expiry(&cache_key, account, ACCOUNT_CACHE_TTL_SECONDS)
                .await;
        }

        Ok(account)
    }

    /// 살아있는 이메일 인증 토큰 해시로 계정 조회
    ///
    /// 해시가 일치하고 만료 시각이 아직 미래인 계정만 반환합니다.
    /// 소비되었거나 만료된 토큰은 조회되지 않으므로 호출 측은 `None`을
    /// 토큰 무효로 해석하면 됩니다. 비교는 항상 해시로만 수행합니다.
    pub async fn find_by_live_email_verification_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, AppError> {
        self.collection::<Account>()
            .find_one(doc! {
                "email_verification_token": token_hash,
                "email_verification_token_expiry": { "$gt": DateTime::now() },
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 살아있는 비밀번호 재설정 토큰 해시로 계정 조회
    ///
    /// 이메일 인증 토큰과 별개의 필드를 사용하며 서로 교차 검증되지 않습니다.
    pub async fn find_by_live_forgot_password_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, AppError> {
        self.collection::<Account>()
            .find_one(doc! {
                "forgot_password_token": token_hash,
                "forgot_password_token_expiry": { "$gt": DateTime::now() },
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 새 계정 생성
    ///
    /// 이메일과 사용자명의 중복 여부를 사전에 검증하고,
    /// 성공 시 컬렉션 캐시를 무효화합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(Account)` - 생성된 계정 (ID 포함)
    /// * `Err(AppError::ConflictError)` - 이메일 또는 사용자명 중복
    pub async fn create(&self, mut account: Account) -> Result<Account, AppError> {
        if self.find_by_email(&account.email).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        if self.find_by_username(&account.username).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string()));
        }

        let result = self.collection::<Account>()
            .insert_one(&account)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        account.id = result.inserted_id.as_object_id();

        let _ = self.invalidate_collection_cache(None).await;

        Ok(account)
    }

    /// 계정 정보 부분 업데이트
    ///
    /// 전달된 필드들을 `$set`으로 반영하고 `updated_at`을 함께 갱신합니다.
    /// `find_one_and_update` + `ReturnDocument::After`로 조회와 갱신을
    /// 원자적으로 수행하여 최신 문서를 돌려받습니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(Account))` - 업데이트된 계정 정보
    /// * `Ok(None)` - 해당 ID의 계정이 존재하지 않음
    pub async fn update(
        &self,
        id: &str,
        mut update_doc: Document,
    ) -> Result<Option<Account>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        update_doc.insert("updated_at", DateTime::now());

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        let updated = self.collection::<Account>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref account) = updated {
            self.invalidate_account_cache(id, &account.email).await;
        }

        Ok(updated)
    }

    /// 리프레시 토큰을 계정의 유일한 활성 값으로 교체하거나 제거합니다.
    ///
    /// `None`을 전달하면 로그아웃 의미로 토큰을 무조건 제거합니다.
    /// 비교-교환 없이 마지막 쓰기가 이기는(last-write-wins) 단순 갱신입니다.
    pub async fn set_refresh_token(
        &self,
        id: &str,
        refresh_token: Option<&str>,
    ) -> Result<Option<Account>, AppError> {
        let value = match refresh_token {
            Some(token) => Bson::String(token.to_string()),
            None => Bson::Null,
        };

        self.update(id, doc! { "refresh_token": value }).await
    }

    /// 이메일 인증 토큰을 소비하고 계정을 인증 상태로 전환합니다.
    ///
    /// 해시/만료 제거와 인증 플래그 설정이 한 번의 갱신으로 수행되므로
    /// 같은 토큰의 두 번째 제시는 반드시 실패합니다 (one-time use).
    pub async fn consume_email_verification(&self, id: &str) -> Result<Option<Account>, AppError> {
        self.update(id, doc! {
            "email_verification_token": Bson::Null,
            "email_verification_token_expiry": Bson::Null,
            "is_email_verified": true,
        })
        .await
    }

    /// 비밀번호 재설정 토큰을 소비하고 새 비밀번호 해시를 저장합니다.
    pub async fn consume_forgot_password(
        &self,
        id: &str,
        new_password_hash: &str,
    ) -> Result<Option<Account>, AppError> {
        self.update(id, doc! {
            "forgot_password_token": Bson::Null,
            "forgot_password_token_expiry": Bson::Null,
            "password": new_password_hash,
        })
        .await
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 애플리케이션 초기화 시점에 한 번 실행하여 쿼리 성능을 최적화합니다.
    ///
    /// 1. **이메일 유니크 인덱스** - 중복 방지 및 조회 최적화
    /// 2. **사용자명 유니크 인덱스** - 중복 방지 및 조회 최적화
    /// 3. **생성일 인덱스** - 최근 가입 계정 정렬 최적화
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<Account>();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("username_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        collection
            .create_indexes([email_index, username_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// 이메일 조회 캐시 키
    fn email_cache_key(email: &str) -> String {
        format!("account:email:{}", email)
    }

    /// 해당 계정의 id/email 캐시 키를 모두 무효화합니다.
    async fn invalidate_account_cache(&self, id: &str, email: &str) {
        let _ = self.invalidate_cache(id).await;
        let _ = self.redis.del(&Self::email_cache_key(email)).await;
    }
}

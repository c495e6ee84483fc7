//! # Redis 캐시 클라이언트 구현
//!
//! Redis를 백엔드로 하는 캐시 클라이언트를 제공합니다.
//! 타입 안전성과 비동기 처리를 지원하며, Serde를 통한 투명한 JSON 변환을 수행합니다.
//!
//! Redis 연결은 멀티플렉싱을 사용하여 단일 TCP 연결에서
//! 여러 동시 요청을 효율적으로 처리합니다.

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::env;

/// Redis 캐시 클라이언트 래퍼
///
/// - **연결 풀링**: 내부적으로 멀티플렉싱된 연결 사용
/// - **자동 직렬화**: JSON 기반 객체 저장/조회
/// - **타입 안전성**: 제네릭을 통한 컴파일 타임 타입 검증
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let redis = RedisClient::new().await?;
///
/// redis.set_with_expiry("account:123", &account, 600).await?;
/// let cached: Option<Account> = redis.get("account:123").await?;
/// ```
#[derive(Clone)]
pub struct RedisClient {
    /// 멀티플렉싱을 지원하는 Redis 클라이언트
    client: Client,
}

impl RedisClient {
    /// 새 Redis 클라이언트 인스턴스를 생성합니다.
    ///
    /// 환경 변수 `REDIS_URL`에서 Redis 서버 주소를 읽어오며,
    /// 설정되지 않은 경우 기본값 `redis://localhost:6379`를 사용합니다.
    /// 생성 시 PING 명령으로 서버 가용성을 확인합니다.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;

        // 연결 테스트 - PING 명령으로 서버 가용성 확인
        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        println!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    /// 지정된 키에서 값을 조회합니다.
    ///
    /// JSON으로 직렬화된 데이터를 자동으로 역직렬화하여 반환합니다.
    ///
    /// ## 반환값
    ///
    /// - `Ok(Some(T))` - 키가 존재하고 역직렬화 성공
    /// - `Ok(None)` - 키가 존재하지 않음
    /// - `Err(RedisError)` - Redis 오류 또는 역직렬화 실패
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => {
                let deserialized = serde_json::from_str(&json)
                    .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "Deserialization failed", e.to_string())))?;
                Ok(Some(deserialized))
            }
            None => Ok(None),
        }
    }

    /// 지정된 키에 값을 저장합니다.
    ///
    /// 객체를 JSON으로 직렬화하여 저장합니다. 기존 키가 있으면 덮어쓰며,
    /// TTL이 설정되지 않으므로 영구 저장됩니다.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value)
            .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialization failed", e.to_string())))?;
        conn.set(key, json).await
    }

    /// 만료 시간과 함께 값을 저장합니다.
    ///
    /// TTL(Time To Live)이 있는 캐시 저장을 제공합니다.
    ///
    /// ## 인자
    ///
    /// - `key` - 저장할 Redis 키
    /// - `value` - 저장할 값
    /// - `seconds` - 만료 시간 (초 단위)
    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: usize) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value)
            .map_err(|e| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialization failed", e.to_string())))?;
        conn.set_ex(key, json, seconds as u64).await
    }

    /// 지정된 키를 삭제합니다.
    ///
    /// 캐시 무효화에 사용합니다. 키가 없어도 성공으로 처리됩니다.
    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    /// 여러 키를 한 번에 삭제합니다.
    ///
    /// 대량의 캐시 무효화가 필요할 때 개별 삭제보다 효율적인
    /// 배치 삭제를 제공합니다. 빈 배열은 즉시 성공을 반환합니다.
    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(keys).await
    }

    /// 패턴과 일치하는 키들을 검색합니다.
    ///
    /// Redis의 KEYS 명령을 래핑하여 와일드카드 패턴으로 키를 검색합니다.
    ///
    /// KEYS는 블로킹 연산입니다. 운영 데이터가 커지면 SCAN 기반으로
    /// 교체해야 합니다.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.keys(pattern).await
    }
}

impl Default for RedisClient {
    /// 기본 설정으로 RedisClient를 생성합니다.
    ///
    /// 주의: 이 메서드는 동기적이므로 실제 Redis 연결 테스트를 수행하지 않습니다.
    /// 프로덕션 환경에서는 `RedisClient::new().await`를 사용하세요.
    fn default() -> Self {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)
            .expect("Failed to create Redis client with default configuration");

        Self { client }
    }
}

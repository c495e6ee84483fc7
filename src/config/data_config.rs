//! 데이터 및 서버 설정 관리 모듈
//!
//! 서버, 환경, 보안(비밀번호 해싱), Rate Limiting 관련 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 또는 `NODE_ENV` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| env::var("NODE_ENV").unwrap_or_else(|_| "production".to_string()))
            .to_lowercase()
            .as_str()
        {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// HTTP 서버 바인딩 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩할 호스트 주소
    pub host: String,
    /// 바인딩할 포트
    pub port: u16,
    /// 워커 스레드 수
    pub workers: usize,
    /// 이메일 액션 링크 생성에 사용하는 외부 공개 주소
    pub public_base_url: String,
}

impl ServerConfig {
    /// 환경 변수에서 서버 설정을 읽어옵니다.
    ///
    /// - `HOST` (기본값: "127.0.0.1")
    /// - `PORT` (기본값: 8080)
    /// - `SERVER_WORKERS` (기본값: 4)
    /// - `PUBLIC_BASE_URL` (기본값: "http://{host}:{port}")
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .unwrap_or(8080);
        let workers = env::var("SERVER_WORKERS")
            .unwrap_or_else(|_| "4".to_string())
            .parse::<usize>()
            .unwrap_or(4);
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            host,
            port,
            workers,
            public_base_url,
        }
    }

    /// `host:port` 형태의 바인딩 주소를 반환합니다.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 패스워드 해싱 설정
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// bcrypt cost (4-15 범위)
    pub bcrypt_cost: u32,
}

impl PasswordConfig {
    /// 환경 변수 `BCRYPT_COST`에서 설정을 읽어옵니다.
    ///
    /// 범위를 벗어나거나 설정이 없는 경우 실행 환경별 기본값을 사용합니다:
    ///
    /// - Development/Test: 4 (빠른 처리)
    /// - Staging: 10 (중간 보안)
    /// - Production: 12 (고보안)
    pub fn from_env() -> Self {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if (4..=15).contains(&cost) {
                    return Self { bcrypt_cost: cost };
                }
                log::warn!("BCRYPT_COST {}은(는) 4-15 범위를 벗어납니다. 환경 기본값 사용", cost);
            }
        }

        Self {
            bcrypt_cost: Self::bcrypt_cost_for_env(&Environment::current()),
        }
    }

    /// 특정 환경에 대한 bcrypt cost 기본값을 반환합니다.
    pub fn bcrypt_cost_for_env(environment: &Environment) -> u32 {
        match environment {
            Environment::Development | Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// Rate Limiting 설정
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// 초당 허용 요청 수
    pub per_second: u64,
    /// 버스트 허용량
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// 환경 변수에서 Rate Limiting 설정을 읽어옵니다.
    ///
    /// - `RATE_LIMIT_PER_SECOND` (기본값: 100)
    /// - `RATE_LIMIT_BURST_SIZE` (기본값: 200)
    pub fn from_env() -> Self {
        let per_second = env::var("RATE_LIMIT_PER_SECOND")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<u64>()
            .unwrap_or_else(|e| {
                log::error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
                100
            });

        let burst_size = env::var("RATE_LIMIT_BURST_SIZE")
            .unwrap_or_else(|_| "200".to_string())
            .parse::<u32>()
            .unwrap_or_else(|e| {
                log::error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
                200
            });

        Self {
            per_second,
            burst_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(Environment::from_str("dev"), Environment::Development);
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("TEST"), Environment::Test);
        assert_eq!(Environment::from_str("stage"), Environment::Staging);
        assert_eq!(Environment::from_str("production"), Environment::Production);

        // 알 수 없는 값은 Production으로 폴백
        assert_eq!(Environment::from_str("banana"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_env() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }
}

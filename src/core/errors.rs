//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 백엔드 서비스를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! 모든 에러는 경계(핸들러 반환 지점)에서 단 한 번 응답 엔벨로프
//! `{statusCode, message, success, errors}` 형태로 정규화됩니다.
//! 프로덕션 환경이 아닌 경우에만 디버그 정보(`stack`)가 포함됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::core::errors::AppError;
//!
//! async fn register(data: RegisterRequest) -> Result<Account, AppError> {
//!     if account_repo.find_by_email(&data.email).await?.is_some() {
//!         return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
//!     }
//!     // ...
//! }
//! ```

use thiserror::Error;

use crate::config::Environment;

/// 일회용 토큰(이메일 인증/비밀번호 재설정)이 만료되었거나 이미 소비된 경우
/// 사용하는 커스텀 상태 코드. 원본 서비스와의 클라이언트 호환을 위해 유지합니다.
pub const TOKEN_INVALID_OR_EXPIRED_STATUS: u16 = 489;

/// 애플리케이션 전역 에러 타입
///
/// 백엔드 서비스에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
///
/// | 변형 | HTTP Status |
/// |------|-------------|
/// | `ValidationError` | 400 Bad Request |
/// | `NotFound` | 404 Not Found |
/// | `ConflictError` | 409 Conflict |
/// | `AuthenticationError` | 401 Unauthorized |
/// | `AuthorizationError` | 403 Forbidden |
/// | `TokenInvalidOrExpired` | 489 (커스텀) |
/// | 나머지 | 500 Internal Server Error |
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    ///
    /// 로그인 실패, JWT 만료/서명 불일치, 리프레시 토큰 불일치 등을 포괄합니다.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 일회용 토큰이 유효하지 않거나 만료됨 (489 커스텀 코드)
    ///
    /// 이메일 인증/비밀번호 재설정 토큰이 이미 소비되었거나 TTL이 지난 경우입니다.
    /// 일반 인증 실패(401)와 구분하여 클라이언트가 재발급 플로우를 안내할 수 있습니다.
    #[error("Token is invalid or expired: {0}")]
    TokenInvalidOrExpired(String),

    /// 외부 서비스 에러 (500 Internal Server Error)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 이 에러에 대응하는 HTTP 상태 코드를 반환합니다.
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::TokenInvalidOrExpired(_) => {
                StatusCode::from_u16(TOKEN_INVALID_OR_EXPIRED_STATUS)
                    .unwrap_or(StatusCode::UNAUTHORIZED)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 클라이언트에게 노출할 메시지를 반환합니다.
    ///
    /// 5xx 계열은 내부 정보를 감추고 일반화된 메시지로 대체합니다.
    /// 상세 내용은 서버 로그에만 남습니다.
    fn client_message(&self) -> String {
        if self.http_status().is_server_error() && Environment::current() == Environment::Production
        {
            "서버 오류가 발생했습니다".to_string()
        } else {
            self.to_string()
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        self.http_status()
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 엔벨로프 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.http_status();

        if status.is_server_error() {
            log::error!("{} - Status: {}", self, status.as_u16());
        } else {
            log::warn!("{} - Status: {}", self, status.as_u16());
        }

        let message = self.client_message();
        let mut body = serde_json::json!({
            "statusCode": status.as_u16(),
            "message": message,
            "success": false,
            "errors": [message],
        });

        // 프로덕션이 아닌 환경에서만 디버그 표현을 첨부한다
        if Environment::current() != Environment::Production {
            body["stack"] = serde_json::Value::String(format!("{:?}", self));
        }

        actix_web::HttpResponse::build(status).json(body)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("이메일은 필수입니다".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("사용자를 찾을 수 없습니다".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_error_response() {
        let error = AppError::ConflictError("이미 사용 중인 이메일입니다".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_token_invalid_or_expired_uses_custom_status() {
        let error = AppError::TokenInvalidOrExpired("토큰이 만료되었습니다".to_string());
        let response = error.error_response();

        assert_eq!(response.status().as_u16(), TOKEN_INVALID_OR_EXPIRED_STATUS);
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("예상치 못한 오류".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}

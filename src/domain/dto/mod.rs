//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 데이터를 전송하기 위한 객체들을 정의하는 모듈입니다.
//! 클라이언트와 서버 간의 데이터 계약(Contract)을 명확히 정의하며,
//! `validator` crate를 통해 요청 본문의 유효성 검증을 내장합니다.
//!
//! ## 모듈 구조
//!
//! ```text
//! dto/
//! ├── accounts/           # 계정 생명주기 관련 DTO
//! │   ├── request.rs      # 회원가입/로그인/토큰/비밀번호/역할 요청
//! │   └── response.rs     # 민감 정보가 제거된 계정/인증 응답
//! └── profiles/           # 프로필 관련 DTO
//!     ├── request.rs      # 프로필/커버 이미지 수정 요청
//!     └── response.rs     # 프로필 집계 읽기 모델
//! ```
//!
//! ## 응답 엔벨로프
//!
//! 모든 응답은 `{statusCode, message, success, data}` 형태의
//! 엔벨로프로 감싸여 전달됩니다. 에러의 경우 `data` 대신 `errors`
//! 배열이 포함됩니다 (에러 쪽은 `core::errors`에서 생성).

pub mod accounts;
pub mod profiles;

use serde::Serialize;

/// 성공 응답 엔벨로프
///
/// `success`는 상태 코드에서 유도됩니다 (`statusCode < 400`).
///
/// ```json
/// {
///   "statusCode": 200,
///   "message": "프로필을 조회했습니다",
///   "success": true,
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 임의 상태 코드의 엔벨로프를 생성합니다.
    pub fn new(status_code: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status_code,
            message: message.into(),
            success: status_code < 400,
            data,
        }
    }

    /// 200 OK 엔벨로프를 생성합니다.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(200, message, Some(data))
    }

    /// 201 Created 엔벨로프를 생성합니다.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(201, message, Some(data))
    }
}

impl ApiResponse<()> {
    /// 데이터 없이 메시지만 담는 엔벨로프를 생성합니다.
    pub fn message(status_code: u16, message: impl Into<String>) -> Self {
        Self::new(status_code, message, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_flag_derived_from_status() {
        let ok = ApiResponse::ok("done", serde_json::json!({"x": 1}));
        assert!(ok.success);

        let created = ApiResponse::created("made", serde_json::json!({}));
        assert_eq!(created.status_code, 201);
        assert!(created.success);

        let failed = ApiResponse::<()>::message(404, "missing");
        assert!(!failed.success);
    }

    #[test]
    fn test_envelope_json_shape() {
        let envelope = ApiResponse::ok("완료", serde_json::json!({"id": "1"}));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "완료");
        assert_eq!(json["data"]["id"], "1");
    }

    #[test]
    fn test_envelope_null_data() {
        let envelope = ApiResponse::<()>::message(200, "로그아웃 되었습니다");
        let json = serde_json::to_value(&envelope).unwrap();

        assert!(json["data"].is_null());
    }
}

//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청 검증과 엔벨로프 응답 구성만 담당하고,
//! 비즈니스 로직은 싱글톤 서비스에 위임합니다.
//!
//! ```text
//! Handlers (이 모듈)  ← 요청/응답 처리
//!      │
//! Services           ← 비즈니스 로직
//!      │
//! Repositories       ← 데이터 액세스
//! ```

pub mod accounts;
pub mod follows;
pub mod profiles;

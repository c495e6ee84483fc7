//! 미디어 스토리지 협력 서비스 모듈

pub mod storage_service;

//! 프로필 집계 서비스 모듈

pub mod profile_service;

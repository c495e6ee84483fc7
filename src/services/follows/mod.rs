//! 팔로우 그래프 서비스 모듈

pub mod follow_service;

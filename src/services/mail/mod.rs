//! 메일 디스패치 협력 서비스 모듈

pub mod mail_service;

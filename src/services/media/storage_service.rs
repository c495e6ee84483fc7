//! # 미디어 스토리지 서비스 구현
//!
//! 아바타/커버 이미지 자산의 프로바이더 측 삭제를 담당합니다.
//!
//! 업로드는 클라이언트가 스토리지 프로바이더로 직접 수행하고,
//! 코어에는 결과 디스크립터 `{url, public_id}`만 전달됩니다.
//! 이 서비스는 원본 바이트를 다루지 않습니다.

use std::time::Duration;
use once_cell::sync::Lazy;
use singleton_macro::service;

use crate::config::AppConfig;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_default()
});

/// 미디어 스토리지 협력 서비스
#[service(name = "media")]
pub struct MediaStorageService {
    // 외부 의존성 없음
}

impl MediaStorageService {
    /// 프로바이더 자산을 public id로 삭제합니다.
    ///
    /// 교체 플로우에서 이전 자산을 정리하는 best-effort 호출입니다.
    /// 실패는 로그로만 남기며, 프로바이더가 삭제를 확인한 경우에만
    /// `true`를 반환합니다.
    pub async fn delete(&self, public_id: &str) -> bool {
        let config = AppConfig::get();
        let url = format!(
            "{}/assets/{}",
            config.media.gateway_url,
            urlencoding::encode(public_id),
        );

        match HTTP_CLIENT.delete(&url).send().await {
            Ok(response) if response.status().is_success() => {
                log::info!("미디어 자산 삭제 완료 - public_id: {}", public_id);
                true
            }
            Ok(response) => {
                log::warn!(
                    "미디어 자산 삭제 실패 - public_id: {}, status: {}",
                    public_id,
                    response.status()
                );
                false
            }
            Err(e) => {
                log::warn!("미디어 게이트웨이 호출 실패 - public_id: {}, error: {}", public_id, e);
                false
            }
        }
    }
}

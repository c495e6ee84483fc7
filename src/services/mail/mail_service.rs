//! # 메일 디스패치 서비스 구현
//!
//! 이메일 인증/비밀번호 재설정 메일을 외부 메일 게이트웨이로 전달합니다.
//!
//! 발송 실패는 어떤 경우에도 호출한 요청을 실패시키지 않습니다.
//! 에러는 로그로만 남고 호출 측에는 전파되지 않습니다. 클라이언트는
//! 재발송 엔드포인트로 재시도할 수 있습니다.

use std::time::Duration;
use once_cell::sync::Lazy;
use serde::Serialize;
use singleton_macro::service;

use crate::config::AppConfig;
use crate::domain::entities::accounts::account::Account;

/// 외부 호출용 HTTP 클라이언트
///
/// 메일 게이트웨이가 응답하지 않아도 요청 태스크가 붙잡히지 않도록
/// 고정 타임아웃을 걸어둔다.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap_or_default()
});

/// 메일 템플릿 종류
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MailTemplate {
    /// 이메일 인증 안내
    EmailVerification,
    /// 비밀번호 재설정 안내
    PasswordReset,
}

/// 게이트웨이로 전달되는 발송 요청 본문
#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    recipient: &'a str,
    subject: &'a str,
    sender_name: &'a str,
    template: MailTemplate,
    params: MailParams<'a>,
}

/// 템플릿 치환 파라미터
#[derive(Debug, Serialize)]
struct MailParams<'a> {
    username: &'a str,
    product_name: &'a str,
    action_url: &'a str,
}

/// 메일 디스패치 서비스
#[service(name = "mail")]
pub struct MailService {
    // 외부 의존성 없음
}

impl MailService {
    /// 이메일 인증 메일 발송
    ///
    /// 인증 링크에는 일회용 토큰의 원문이 포함됩니다. 토큰 원문은
    /// 수신자에게만 전달되어야 하므로 URL을 로그에 남기지 않습니다.
    pub async fn send_verification_email(&self, account: &Account, client_token: &str) {
        let config = AppConfig::get();
        let action_url = format!(
            "{}/api/v1/accounts/verify-email/{}",
            config.server.public_base_url,
            urlencoding::encode(client_token),
        );

        self.dispatch(
            &account.email,
            "이메일 인증 안내",
            MailTemplate::EmailVerification,
            &account.username,
            &action_url,
        )
        .await;
    }

    /// 비밀번호 재설정 메일 발송
    ///
    /// 링크는 프론트엔드 재설정 페이지를 가리키며, 프론트엔드가 토큰과
    /// 새 비밀번호를 재설정 엔드포인트로 전달합니다.
    pub async fn send_password_reset_email(&self, account: &Account, client_token: &str) {
        let config = AppConfig::get();
        let action_url = format!(
            "{}/{}",
            config.mail.forgot_password_redirect_url,
            urlencoding::encode(client_token),
        );

        self.dispatch(
            &account.email,
            "비밀번호 재설정 안내",
            MailTemplate::PasswordReset,
            &account.username,
            &action_url,
        )
        .await;
    }

    /// 게이트웨이로 발송 요청을 전달합니다.
    ///
    /// 실패는 로그로만 기록됩니다. 토큰이 포함된 action_url은 절대
    /// 로그에 포함하지 않습니다.
    async fn dispatch(
        &self,
        recipient: &str,
        subject: &str,
        template: MailTemplate,
        username: &str,
        action_url: &str,
    ) {
        let config = AppConfig::get();

        let payload = MailPayload {
            recipient,
            subject,
            sender_name: &config.mail.sender_name,
            template,
            params: MailParams {
                username,
                product_name: &config.mail.product_name,
                action_url,
            },
        };

        let result = HTTP_CLIENT
            .post(&config.mail.gateway_url)
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                log::info!("메일 발송 완료 - recipient: {}, template: {:?}", recipient, template);
            }
            Ok(response) => {
                log::error!(
                    "메일 게이트웨이가 실패를 반환했습니다 - recipient: {}, template: {:?}, status: {}",
                    recipient,
                    template,
                    response.status()
                );
            }
            Err(e) => {
                log::error!(
                    "메일 발송 실패 (무시됨) - recipient: {}, template: {:?}, error: {}",
                    recipient,
                    template,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_template_serialization() {
        assert_eq!(
            serde_json::to_string(&MailTemplate::EmailVerification).unwrap(),
            "\"email_verification\""
        );
        assert_eq!(
            serde_json::to_string(&MailTemplate::PasswordReset).unwrap(),
            "\"password_reset\""
        );
    }

    #[test]
    fn test_mail_payload_shape() {
        let payload = MailPayload {
            recipient: "alice@example.com",
            subject: "이메일 인증 안내",
            sender_name: "Social Network API",
            template: MailTemplate::EmailVerification,
            params: MailParams {
                username: "alice",
                product_name: "Social Network API",
                action_url: "http://localhost:8080/api/v1/accounts/verify-email/abc",
            },
        };

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["recipient"], "alice@example.com");
        assert_eq!(json["template"], "email_verification");
        assert_eq!(json["params"]["username"], "alice");
        assert!(json["params"]["action_url"].as_str().unwrap().contains("verify-email"));
    }
}

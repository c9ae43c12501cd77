//! 텔레그램 Bot API 클라이언트 및 알림 전송기.
//!
//! Telegram Bot API를 통해 리더보드 메시지를 전송하고 업데이트를 수신합니다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::types::{NotificationError, NotificationResult, NotificationSender, PARSE_MODE_HTML};

/// 기본 Bot API 주소.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// 429 응답에 retry_after가 없을 때 사용하는 대기 시간 (초)
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// 텔레그램 설정.
#[derive(Debug)]
pub struct TelegramConfig {
    /// @BotFather에서 받은 봇 토큰
    pub bot_token: SecretString,
    /// 정기 리더보드를 보낼 채팅 ID
    pub chat_id: String,
    /// Bot API 주소
    pub api_url: String,
    /// 전송 활성화 여부
    pub enabled: bool,
}

impl TelegramConfig {
    /// 새 텔레그램 설정을 생성합니다.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        let bot_token: String = bot_token.into();
        Self {
            bot_token: SecretString::new(bot_token.into_boxed_str()),
            chat_id: chat_id.into(),
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            enabled: true,
        }
    }

    /// Bot API 주소를 설정합니다.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Bot API 공통 응답.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

/// 개별 업데이트.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

/// 메시지 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub chat: TelegramChat,
    pub text: Option<String>,
}

/// 채팅 정보.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

/// 봇 계정 정보 (`getMe`).
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub username: Option<String>,
}

/// Telegram Bot API HTTP 클라이언트.
///
/// 내부 상태는 `Arc`로 공유되므로 복제 비용이 작습니다.
#[derive(Debug, Clone)]
pub struct TelegramApi {
    client: reqwest::Client,
    api_url: Arc<str>,
    bot_token: Arc<SecretString>,
}

impl TelegramApi {
    /// 설정으로부터 클라이언트를 생성합니다.
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: Arc::from(config.api_url.trim_end_matches('/')),
            bot_token: Arc::new(SecretString::new(Box::from(
                config.bot_token.expose_secret(),
            ))),
        }
    }

    /// 토큰이 설정되어 있는지 확인합니다.
    pub fn has_token(&self) -> bool {
        !self.bot_token.expose_secret().is_empty()
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url,
            self.bot_token.expose_secret(),
            method
        )
    }

    /// 메시지를 전송합니다.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: &str,
    ) -> NotificationResult<()> {
        let params = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": parse_mode,
            "disable_web_page_preview": true,
        });

        debug!(chat_id = %chat_id, "Sending Telegram message");

        // 에러 메시지에 토큰이 포함된 URL이 남지 않도록 제거
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&params)
            .send()
            .await
            .map_err(|e| NotificationError::NetworkError(e.without_url()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<ApiResponse<serde_json::Value>> = serde_json::from_str(&body).ok();

        if status.as_u16() == 429 {
            let retry_after = parsed
                .as_ref()
                .and_then(|r| r.parameters.as_ref())
                .and_then(|p| p.retry_after)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!(retry_after, "Telegram rate limited");
            return Err(NotificationError::RateLimited(retry_after));
        }

        let description = parsed.and_then(|r| r.description).unwrap_or(body);
        error!("Failed to send Telegram message: {} - {}", status, description);
        Err(NotificationError::SendFailed(format!(
            "HTTP {}: {}",
            status.as_u16(),
            description
        )))
    }

    /// 봇 자신의 계정 정보를 조회합니다.
    pub async fn get_me(&self) -> NotificationResult<TelegramUser> {
        let response = self
            .client
            .post(self.method_url("getMe"))
            .send()
            .await
            .map_err(|e| NotificationError::NetworkError(e.without_url()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| NotificationError::NetworkError(e.without_url()))?;
        let me: ApiResponse<TelegramUser> = serde_json::from_slice(&body)?;

        match me.result {
            Some(user) if me.ok => Ok(user),
            _ => Err(NotificationError::SendFailed(format!(
                "getMe 실패: {}",
                me.description.unwrap_or_default()
            ))),
        }
    }

    /// Long polling으로 업데이트를 조회합니다.
    ///
    /// `offset` 이상의 update_id만 반환됩니다.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> NotificationResult<Vec<TelegramUpdate>> {
        let params = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });

        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .json(&params)
            .timeout(Duration::from_secs(timeout_secs + 5))
            .send()
            .await
            .map_err(|e| NotificationError::NetworkError(e.without_url()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| NotificationError::NetworkError(e.without_url()))?;
        let updates: ApiResponse<Vec<TelegramUpdate>> = serde_json::from_slice(&body)?;

        if !updates.ok {
            return Err(NotificationError::SendFailed(format!(
                "getUpdates 실패: {}",
                updates.description.unwrap_or_default()
            )));
        }

        Ok(updates.result.unwrap_or_default())
    }
}

/// 지정 채팅으로 리더보드를 보내는 전송기.
pub struct TelegramSender {
    api: TelegramApi,
    chat_id: String,
    enabled: bool,
}

impl TelegramSender {
    /// 새 텔레그램 전송기를 생성합니다.
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            api: TelegramApi::new(config),
            chat_id: config.chat_id.clone(),
            enabled: config.enabled,
        }
    }

    /// 대상 채팅 ID.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    async fn send(&self, text: &str) -> NotificationResult<()> {
        if !self.is_enabled() {
            debug!("Telegram notifications are disabled, skipping");
            return Ok(());
        }

        self.api
            .send_message(&self.chat_id, text, PARSE_MODE_HTML)
            .await?;
        info!(chat_id = %self.chat_id, "Telegram notification sent successfully");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled && self.api.has_token() && !self.chat_id.is_empty()
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url_trims_trailing_slash() {
        let config = TelegramConfig::new("123:abc", "42").with_api_url("http://localhost:8081/");
        let api = TelegramApi::new(&config);
        assert_eq!(
            api.method_url("sendMessage"),
            "http://localhost:8081/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_config_debug_hides_token() {
        let config = TelegramConfig::new("123:super-secret", "42");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_sender_enabled() {
        let sender = TelegramSender::new(&TelegramConfig::new("123:abc", "42"));
        assert!(sender.is_enabled());
        assert_eq!(sender.chat_id(), "42");

        let no_chat = TelegramSender::new(&TelegramConfig::new("123:abc", ""));
        assert!(!no_chat.is_enabled());

        let mut config = TelegramConfig::new("123:abc", "42");
        config.enabled = false;
        assert!(!TelegramSender::new(&config).is_enabled());
    }
}

use crate::notifier::{Notifier, NotifyResult};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

// ============================================================================
// Telegram 通知
// ============================================================================

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,

    /// 接收告警的聊天 ID 列表
    #[serde(default)]
    pub chat_ids: Vec<String>,

    /// 静默发送
    #[serde(default)]
    pub disable_notification: bool,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// 凭据是否完整
    pub fn is_configured(&self) -> bool {
        self.bot_token.as_deref().is_some_and(|t| !t.is_empty()) && !self.chat_ids.is_empty()
    }

    /// 用 `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`（逗号分隔）补全缺失的凭据
    pub fn with_env_fallback(mut self) -> Self {
        if self.bot_token.is_none() {
            self.bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok();
        }
        if self.chat_ids.is_empty() {
            if let Ok(ids) = std::env::var("TELEGRAM_CHAT_ID") {
                self.chat_ids = ids
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
        self
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_ids: Vec::new(),
            disable_notification: false,
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub struct TelegramNotifier {
    bot_token: String,
    api_base: String,
    disable_notification: bool,
    client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: impl Into<String>, config: &TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            bot_token: bot_token.into(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            disable_notification: config.disable_notification,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }

    fn build_message(&self, chat_id: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_notification": self.disable_notification,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, recipient: &str, text: &str) -> Result<NotifyResult> {
        let body = self.build_message(recipient, text);

        let response = self.client.post(self.endpoint()).json(&body).send().await?;
        let status = response.status();
        let reply: TelegramResponse = response.json().await?;

        if status.is_success() && reply.ok {
            Ok(NotifyResult::success())
        } else {
            Ok(NotifyResult::failure(format!(
                "Telegram failed: {} {}",
                status,
                reply.description.unwrap_or_default()
            )))
        }
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

// ============================================================================
// Webhook 通知
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    pub headers: Option<std::collections::HashMap<String, String>>,
}

pub struct WebhookNotifier {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, recipient: &str, text: &str) -> Result<NotifyResult> {
        let mut request = self.client.post(&self.config.url);

        if let Some(headers) = &self.config.headers {
            for (key, value) in headers {
                request = request.header(key, value);
            }
        }

        let response = request
            .json(&serde_json::json!({ "recipient": recipient, "text": text }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(NotifyResult::success())
        } else {
            Ok(NotifyResult::failure(format!(
                "Webhook failed with status: {}",
                response.status()
            )))
        }
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

// ============================================================================
// 仅日志（未配置凭据时）
// ============================================================================

/// 只写日志、从不投递的通知器
///
/// 每次发送都报告失败，因此不会启动告警冷却
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        info!("No notification credentials configured; alerts will be logged only");
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, recipient: &str, text: &str) -> Result<NotifyResult> {
        info!(recipient = %recipient, "Notification would have been sent: {}", text);
        Ok(NotifyResult::failure("notifier not configured"))
    }

    fn name(&self) -> &str {
        "log"
    }
}

use crate::message::{Severity, TemplateFields, TemplateValue};
use crate::notifier::{AlertNotifier, Notifier};
use crate::providers::LogNotifier;
use crate::template::{self, TemplateRegistry};
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// 消息中的时间格式
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// 通知管理器
///
/// 负责模板渲染与逐个接收者的尽力投递
pub struct NotifyManager {
    /// 传输通道
    notifier: Arc<dyn Notifier>,

    /// 接收者列表
    recipients: Vec<String>,

    /// 消息模板
    templates: RwLock<TemplateRegistry>,
}

impl NotifyManager {
    pub fn new(notifier: Arc<dyn Notifier>, recipients: Vec<String>) -> Self {
        Self {
            notifier,
            recipients,
            templates: RwLock::new(TemplateRegistry::default()),
        }
    }

    /// 未配置任何通道时使用：只记录日志
    pub fn log_only() -> Self {
        Self::new(Arc::new(LogNotifier::new()), vec!["log".to_string()])
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// 注册或覆盖模板
    pub async fn register_template(&self, name: impl Into<String>, template: impl Into<String>) {
        let name = name.into();
        let mut templates = self.templates.write().await;
        templates.register(name.clone(), template);
        info!("Registered notification template: {}", name);
    }

    pub async fn template_names(&self) -> Vec<String> {
        self.templates.read().await.names()
    }

    /// 渲染模板但不发送
    pub async fn render(&self, name: &str, severity: Severity, fields: &TemplateFields) -> Result<String> {
        self.templates.read().await.render(name, severity, fields)
    }

    /// 使用具名模板发送
    ///
    /// 模板不存在或缺少字段时返回错误；投递失败只体现在返回的 `bool` 中
    pub async fn send_with_template(
        &self,
        name: &str,
        severity: Severity,
        fields: &TemplateFields,
    ) -> Result<bool> {
        let text = self.render(name, severity, fields).await?;
        Ok(self.deliver(&text).await)
    }

    /// 发送自定义消息
    pub async fn send_custom_alert(&self, message: &str, severity: Severity) -> bool {
        let fields = fields([("message", message.into())]);
        self.send_rendered(template::CUSTOM, severity, &fields).await
    }

    /// 投递到所有接收者，单个接收者失败不影响其余接收者
    pub async fn deliver(&self, text: &str) -> bool {
        if !self.notifier.is_enabled() {
            warn!("Notifier {} disabled, dropping notification", self.notifier.name());
            return false;
        }

        if self.recipients.is_empty() {
            warn!("No notification recipients configured");
            return false;
        }

        let mut delivered = 0usize;
        for recipient in &self.recipients {
            match self.notifier.send(recipient, text).await {
                Ok(result) if result.success => {
                    delivered += 1;
                }
                Ok(result) => {
                    error!(
                        recipient = %recipient,
                        "Notification failed via {}: {}",
                        self.notifier.name(),
                        result.message
                    );
                }
                Err(e) => {
                    error!(
                        recipient = %recipient,
                        "Notification error via {}: {}",
                        self.notifier.name(),
                        e
                    );
                }
            }
        }

        if delivered > 0 {
            info!(
                "Notification delivered via {} to {}/{} recipients",
                self.notifier.name(),
                delivered,
                self.recipients.len()
            );
        }

        delivered > 0
    }

    /// 渲染内置模板并发送；内置模板渲染失败（被错误覆盖）时记录错误并视为未送达
    async fn send_rendered(&self, name: &str, severity: Severity, fields: &TemplateFields) -> bool {
        match self.send_with_template(name, severity, fields).await {
            Ok(sent) => sent,
            Err(e) => {
                error!("Failed to render template {}: {}", name, e);
                false
            }
        }
    }
}

#[async_trait]
impl AlertNotifier for NotifyManager {
    async fn send_humidity_alert(
        &self,
        sensor_name: &str,
        humidity: f64,
        threshold: f64,
        timestamp: DateTime<Utc>,
        severity: Severity,
    ) -> bool {
        let fields = fields([
            ("sensor_name", sensor_name.into()),
            ("humidity", humidity.into()),
            ("threshold", threshold.into()),
            ("timestamp", timestamp.format(TIMESTAMP_FORMAT).to_string().into()),
        ]);
        self.send_rendered(template::HUMIDITY_ALERT, severity, &fields).await
    }

    async fn send_connection_alert(
        &self,
        sensor_name: &str,
        last_connection: DateTime<Utc>,
        threshold_minutes: i64,
        severity: Severity,
    ) -> bool {
        let fields = fields([
            ("sensor_name", sensor_name.into()),
            ("last_connection", last_connection.format(TIMESTAMP_FORMAT).to_string().into()),
            ("threshold", threshold_minutes.into()),
        ]);
        self.send_rendered(template::CONNECTION_ALERT, severity, &fields).await
    }

    async fn send_system_alert(&self, title: &str, message: &str, severity: Severity) -> bool {
        let fields = fields([("title", title.into()), ("message", message.into())]);
        self.send_rendered(template::SYSTEM_ALERT, severity, &fields).await
    }
}

fn fields<const N: usize>(pairs: [(&str, TemplateValue); N]) -> TemplateFields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

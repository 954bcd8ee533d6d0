use crate::message::Severity;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 单个接收者的投递结果
#[derive(Debug, Clone)]
pub struct NotifyResult {
    pub success: bool,
    pub message: String,
}

impl NotifyResult {
    pub fn success() -> Self {
        Self {
            success: true,
            message: "Notification sent successfully".to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 通知传输通道 trait
///
/// 每次调用只面向一个接收者，传输层自行负责超时
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 向单个接收者发送文本
    async fn send(&self, recipient: &str, text: &str) -> Result<NotifyResult>;

    /// 通知器名称
    fn name(&self) -> &str;

    /// 是否启用
    fn is_enabled(&self) -> bool {
        true
    }
}

/// 监控引擎使用的告警出口
///
/// 返回值表示是否至少有一个接收者投递成功
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn send_humidity_alert(
        &self,
        sensor_name: &str,
        humidity: f64,
        threshold: f64,
        timestamp: DateTime<Utc>,
        severity: Severity,
    ) -> bool;

    async fn send_connection_alert(
        &self,
        sensor_name: &str,
        last_connection: DateTime<Utc>,
        threshold_minutes: i64,
        severity: Severity,
    ) -> bool;

    async fn send_system_alert(&self, title: &str, message: &str, severity: Severity) -> bool;
}

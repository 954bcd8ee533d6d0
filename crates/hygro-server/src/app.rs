use crate::config::AppConfig;
use anyhow::Result;
use hygro_api::{create_router, AppState};
use hygro_core::DbSensorStore;
use hygro_monitor::MonitorService;
use hygro_notify::{NotifyManager, TelegramNotifier, WebhookNotifier};
use sea_orm::Database;
use std::sync::Arc;
use tracing::{info, warn};

/// 按配置选择通知通道：Telegram 优先，其次 Webhook，都没有则只写日志
pub fn build_notifier(config: &AppConfig) -> Result<NotifyManager> {
    let telegram = config.telegram.clone().with_env_fallback();
    if telegram.is_configured() {
        if let Some(token) = telegram.bot_token.clone() {
            let notifier = TelegramNotifier::new(token, &telegram)?;
            info!(recipients = telegram.chat_ids.len(), "Telegram notifier registered");
            return Ok(NotifyManager::new(Arc::new(notifier), telegram.chat_ids));
        }
    }

    if let Some(webhook) = &config.webhook {
        let notifier = WebhookNotifier::new(webhook.to_webhook_config());
        info!(url = %webhook.url, "Webhook notifier registered");
        return Ok(NotifyManager::new(Arc::new(notifier), webhook.recipients.clone()));
    }

    warn!("No notifier configured, alerts will only be logged");
    Ok(NotifyManager::log_only())
}

/// 启动服务，直到收到 Ctrl-C / SIGTERM
pub async fn run(config: AppConfig) -> Result<()> {
    info!(database = %config.database.url, "Connecting to database");
    let db = Database::connect(&config.database.url).await?;

    let store = Arc::new(DbSensorStore::new(Arc::new(db)));
    store.create_schema().await?;

    let notifier = Arc::new(build_notifier(&config)?);
    let monitor = Arc::new(MonitorService::new(
        store.clone(),
        notifier,
        config.monitor.clone(),
    )?);
    monitor.start().await;

    let app = create_router(AppState::new(store, monitor.clone()));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor.stop().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookSettings;

    #[test]
    fn test_webhook_selected_without_telegram() {
        let mut config = AppConfig::default();
        config.telegram.bot_token = Some(String::new());
        config.webhook = Some(WebhookSettings {
            url: "http://hooks.local/alert".to_string(),
            headers: None,
            recipients: vec!["ops".to_string(), "oncall".to_string()],
        });

        let manager = build_notifier(&config).unwrap();
        assert_eq!(manager.recipients(), ["ops".to_string(), "oncall".to_string()]);
    }

    #[test]
    fn test_telegram_takes_precedence() {
        let mut config = AppConfig::default();
        config.telegram.bot_token = Some("123:abc".to_string());
        config.telegram.chat_ids = vec!["42".to_string()];
        config.webhook = Some(WebhookSettings {
            url: "http://hooks.local/alert".to_string(),
            headers: None,
            recipients: vec!["ops".to_string()],
        });

        let manager = build_notifier(&config).unwrap();
        assert_eq!(manager.recipients(), ["42".to_string()]);
    }
}

pub mod error;
pub mod manager;
pub mod message;
pub mod notifier;
pub mod providers;
pub mod template;

pub use error::{NotifyError, Result};
pub use manager::NotifyManager;
pub use message::{Severity, TemplateFields, TemplateValue};
pub use notifier::{AlertNotifier, Notifier, NotifyResult};
pub use providers::{LogNotifier, TelegramConfig, TelegramNotifier, WebhookConfig, WebhookNotifier};
pub use template::TemplateRegistry;

pub mod app;
pub mod config;
pub mod logging;

pub use app::{build_notifier, run};
pub use config::AppConfig;

pub mod config;
pub mod dedup;
pub mod error;
pub mod liveness;
pub mod overview;
pub mod service;
pub mod threshold;

pub use config::MonitorConfig;
pub use dedup::{AlertDeduplicator, AlertKey, AlertKind};
pub use error::{MonitorError, Result};
pub use liveness::Staleness;
pub use service::{CycleReport, MonitorService, MonitorStatus, ThresholdStatus};
pub use threshold::{GlobalThresholds, HumidityBreach, HumidityLevel};
pub use overview::{check_text, overview_text};

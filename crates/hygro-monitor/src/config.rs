use crate::threshold::GlobalThresholds;
use crate::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 监控服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 检查间隔（秒）
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// 湿度上限（全局，用于告警与升级）
    #[serde(default = "default_humidity_threshold_high")]
    pub humidity_threshold_high: f64,

    /// 湿度下限（全局）
    #[serde(default = "default_humidity_threshold_low")]
    pub humidity_threshold_low: f64,

    /// 超过多少分钟未上报视为失联
    #[serde(default = "default_connection_threshold_minutes")]
    pub connection_threshold_minutes: i64,

    /// 同一传感器同类告警的最小重复间隔（小时）
    #[serde(default = "default_alert_cooldown_hours")]
    pub alert_cooldown_hours: i64,
}

fn default_check_interval_secs() -> u64 {
    300
}

fn default_humidity_threshold_high() -> f64 {
    70.0
}

fn default_humidity_threshold_low() -> f64 {
    30.0
}

fn default_connection_threshold_minutes() -> i64 {
    30
}

fn default_alert_cooldown_hours() -> i64 {
    4
}

impl MonitorConfig {
    /// 从 TOML 文件加载配置
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.check_interval_secs == 0 {
            return Err(MonitorError::InvalidConfig(
                "check_interval_secs must be greater than 0".to_string(),
            ));
        }

        if !self.humidity_threshold_low.is_finite() || !self.humidity_threshold_high.is_finite() {
            return Err(MonitorError::InvalidConfig(
                "humidity thresholds must be finite numbers".to_string(),
            ));
        }

        if self.humidity_threshold_low >= self.humidity_threshold_high {
            return Err(MonitorError::InvalidConfig(format!(
                "humidity_threshold_low ({}) must be lower than humidity_threshold_high ({})",
                self.humidity_threshold_low, self.humidity_threshold_high
            )));
        }

        if self.connection_threshold_minutes <= 0 {
            return Err(MonitorError::InvalidConfig(
                "connection_threshold_minutes must be greater than 0".to_string(),
            ));
        }

        if self.alert_cooldown_hours < 0 {
            return Err(MonitorError::InvalidConfig(
                "alert_cooldown_hours cannot be negative".to_string(),
            ));
        }

        Ok(())
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn connection_threshold(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.connection_threshold_minutes)
    }

    pub fn alert_cooldown(&self) -> chrono::Duration {
        chrono::Duration::hours(self.alert_cooldown_hours)
    }

    pub fn global_thresholds(&self) -> GlobalThresholds {
        GlobalThresholds {
            high: self.humidity_threshold_high,
            low: self.humidity_threshold_low,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            humidity_threshold_high: default_humidity_threshold_high(),
            humidity_threshold_low: default_humidity_threshold_low(),
            connection_threshold_minutes: default_connection_threshold_minutes(),
            alert_cooldown_hours: default_alert_cooldown_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.check_interval(), Duration::from_secs(300));
        assert_eq!(config.alert_cooldown(), chrono::Duration::hours(4));
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("monitor.toml");
        fs::write(
            &path,
            r#"
check_interval_secs = 60
humidity_threshold_high = 75.5
"#,
        )
        .unwrap();

        let config = MonitorConfig::load(&path).unwrap();
        assert_eq!(config.check_interval_secs, 60);
        assert_eq!(config.humidity_threshold_high, 75.5);
        assert_eq!(config.humidity_threshold_low, 30.0);
        assert_eq!(config.connection_threshold_minutes, 30);
    }

    #[test]
    fn test_load_rejects_inverted_band() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("monitor.toml");
        fs::write(
            &path,
            "humidity_threshold_high = 20.0\nhumidity_threshold_low = 40.0\n",
        )
        .unwrap();

        assert!(MonitorConfig::load(&path).is_err());
    }

    #[test]
    fn test_validate() {
        let config = MonitorConfig {
            check_interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MonitorError::InvalidConfig(_))));

        let config = MonitorConfig {
            connection_threshold_minutes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

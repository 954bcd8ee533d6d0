use crate::{Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 新建传感器的默认名称
pub const UNKNOWN_SENSOR_NAME: &str = "Unknown";

/// 传感器四级湿度阈值（百分比，0-100）
///
/// 约定顺序：`critical_level < warning_level < alert_level < overflow_level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorThresholds {
    /// 溢出（过湿）上限
    pub overflow_level: i32,

    /// 告警下限
    pub alert_level: i32,

    /// 警告下限
    pub warning_level: i32,

    /// 严重下限
    pub critical_level: i32,
}

impl SensorThresholds {
    pub fn new(overflow_level: i32, alert_level: i32, warning_level: i32, critical_level: i32) -> Self {
        Self {
            overflow_level,
            alert_level,
            warning_level,
            critical_level,
        }
    }

    /// 校验阈值顺序与取值范围
    pub fn validate(&self) -> Result<()> {
        let levels = [
            ("critical_level", self.critical_level),
            ("warning_level", self.warning_level),
            ("alert_level", self.alert_level),
            ("overflow_level", self.overflow_level),
        ];

        for (name, value) in levels {
            if !(0..=100).contains(&value) {
                return Err(StoreError::validation(format!(
                    "{} must be within 0..=100, got {}",
                    name, value
                )));
            }
        }

        for pair in levels.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if lower >= upper {
                return Err(StoreError::validation(format!(
                    "{} ({}) must be lower than {} ({})",
                    lower_name, lower, upper_name, upper
                )));
            }
        }

        Ok(())
    }
}

impl Default for SensorThresholds {
    fn default() -> Self {
        Self {
            overflow_level: 60,
            alert_level: 30,
            warning_level: 20,
            critical_level: 10,
        }
    }
}

/// 湿度传感器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// 传感器 ID
    pub id: i32,

    /// 显示名称
    pub name: String,

    /// 最后一次上报时间
    pub last_connection: DateTime<Utc>,

    /// 阈值配置
    #[serde(flatten)]
    pub thresholds: SensorThresholds,
}

impl Sensor {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            last_connection: Utc::now(),
            thresholds: SensorThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: SensorThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_last_connection(mut self, last_connection: DateTime<Utc>) -> Self {
        self.last_connection = last_connection;
        self
    }
}

/// 湿度测量记录（创建后不可变）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i32,
    pub sensor_id: i32,
    /// 传感器原始读数
    pub raw_value: f64,
    /// 换算后的湿度百分比
    pub humidity: f64,
    pub battery_voltage: f64,
    pub date: DateTime<Utc>,
}

/// 新测量上报
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeasurement {
    pub sensor_id: i32,
    pub raw_value: f64,
    pub humidity: f64,
    #[serde(default)]
    pub battery_voltage: f64,
}

/// 每个传感器的最新读数
///
/// 没有任何测量记录的传感器 `humidity` 与 `timestamp` 为 `None`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestReading {
    pub sensor_id: i32,
    pub sensor_name: String,
    pub humidity: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

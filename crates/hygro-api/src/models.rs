use chrono::{DateTime, Utc};
use hygro_core::SensorThresholds;
use serde::{Deserialize, Serialize};

fn default_limit() -> u64 {
    100
}

fn default_history_days() -> i64 {
    7
}

/// 分页查询参数
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// 重命名请求（查询参数）
#[derive(Debug, Deserialize)]
pub struct RenameQuery {
    pub sensor_id: i32,
    pub new_name: String,
}

/// 阈值更新请求
#[derive(Debug, Deserialize)]
pub struct UpdateThresholdsRequest {
    pub overflow_level: i32,
    pub alert_level: i32,
    pub warning_level: i32,
    pub critical_level: i32,
}

impl From<UpdateThresholdsRequest> for SensorThresholds {
    fn from(req: UpdateThresholdsRequest) -> Self {
        SensorThresholds::new(
            req.overflow_level,
            req.alert_level,
            req.warning_level,
            req.critical_level,
        )
    }
}

/// 历史曲线查询参数
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_days")]
    pub days: i64,
}

#[derive(Debug, Serialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub humidity: f64,
}

/// 单个传感器的湿度历史
#[derive(Debug, Serialize)]
pub struct SensorHistory {
    pub sensor_id: i32,
    pub sensor_name: String,
    pub points: Vec<HistoryPoint>,
}

/// 历史曲线响应
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub sensors: Vec<SensorHistory>,
}

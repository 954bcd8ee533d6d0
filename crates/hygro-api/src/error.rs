use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hygro_core::StoreError;
use hygro_monitor::MonitorError;
use serde_json::json;
use thiserror::Error;

/// API 错误类型
#[derive(Debug, Error)]
pub enum ApiError {
    /// 传感器未找到
    #[error("Sensor not found: {0}")]
    SensorNotFound(i32),

    /// 没有任何传感器
    #[error("No sensors found")]
    NoSensors,

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 数据库错误
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 监控服务错误
    #[error("Monitor error: {0}")]
    MonitorError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::SensorNotFound(_) | ApiError::NoSensors => StatusCode::NOT_FOUND,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::DatabaseError(_)
            | ApiError::MonitorError(_)
            | ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::SensorNotFound(id),
            StoreError::Validation(msg) => ApiError::ValidationError(msg),
            StoreError::Database(e) => ApiError::DatabaseError(e.to_string()),
            StoreError::Other(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<MonitorError> for ApiError {
    fn from(err: MonitorError) -> Self {
        ApiError::MonitorError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

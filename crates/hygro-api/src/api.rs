use crate::{handlers, state::AppState};
use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// 创建 API 路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))

        // 传感器
        .route("/humiditySensors", get(handlers::list_sensors))
        .route("/humiditySensors/rename", post(handlers::rename_sensor))
        .route("/humiditySensors/history", get(handlers::sensor_history))
        .route("/humiditySensor/:sensor_id", get(handlers::get_sensor))
        .route("/humiditySensor/:sensor_id/thresholds", put(handlers::update_thresholds))

        // 测量
        .route("/humidityMeasurements", post(handlers::create_measurement))
        .route("/humidityMeasurements/sensor/:sensor_id", get(handlers::list_sensor_measurements))
        .route("/humidityOverview", get(handlers::humidity_overview))
        .route("/humidity/check", get(handlers::humidity_check))

        // 监控服务
        .route("/monitor/status", get(handlers::monitor_status))
        .route("/monitor/start", post(handlers::start_monitor))
        .route("/monitor/stop", post(handlers::stop_monitor))
        .route("/monitor/check", post(handlers::check_now))

        // 添加中间件
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 健康检查
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

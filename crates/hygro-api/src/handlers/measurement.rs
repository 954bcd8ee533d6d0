use crate::{
    error::{ApiError, Result},
    models::*,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use hygro_core::{Measurement, NewMeasurement};
use hygro_monitor::{check_text, overview_text};
use tracing::{debug, info};

/// 记录测量
pub async fn create_measurement(
    State(state): State<AppState>,
    Json(req): Json<NewMeasurement>,
) -> Result<(StatusCode, Json<Measurement>)> {
    info!(
        sensor_id = %req.sensor_id,
        humidity = %req.humidity,
        "Recording measurement"
    );

    let measurement = state.store.record_measurement(req).await?;
    Ok((StatusCode::CREATED, Json(measurement)))
}

/// 列出某传感器的测量
pub async fn list_sensor_measurements(
    State(state): State<AppState>,
    Path(sensor_id): Path<i32>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<Measurement>>> {
    debug!(sensor_id = %sensor_id, "Listing measurements");

    let measurements = state
        .store
        .list_measurements(sensor_id, query.skip, query.limit)
        .await?;
    Ok(Json(measurements))
}

/// 湿度概览（纯文本）
pub async fn humidity_overview(State(state): State<AppState>) -> Result<String> {
    let sensors = state.store.all_sensors().await?;
    let latest = state.store.latest_measurement_per_sensor().await?;

    Ok(overview_text(&sensors, &latest, Utc::now()))
}

/// 仅列出超出阈值的传感器（纯文本）
pub async fn humidity_check(State(state): State<AppState>) -> Result<String> {
    let sensors = state.store.all_sensors().await?;
    if sensors.is_empty() {
        return Err(ApiError::NoSensors);
    }
    let latest = state.store.latest_measurement_per_sensor().await?;

    Ok(check_text(&sensors, &latest, Utc::now()))
}

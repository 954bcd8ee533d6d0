use crate::{
    error::{ApiError, Result},
    models::*,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, Utc};
use hygro_core::Sensor;
use std::collections::HashMap;
use tracing::{debug, info};

/// 历史查询允许的最大天数
const MAX_HISTORY_DAYS: i64 = 90;

/// 列出传感器
pub async fn list_sensors(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<Sensor>>> {
    debug!(skip = query.skip, limit = query.limit, "Listing sensors");

    let sensors = state.store.list_sensors(query.skip, query.limit).await?;
    Ok(Json(sensors))
}

/// 获取传感器
pub async fn get_sensor(
    State(state): State<AppState>,
    Path(sensor_id): Path<i32>,
) -> Result<Json<Sensor>> {
    debug!(sensor_id = %sensor_id, "Getting sensor");

    let sensor = state
        .store
        .get_sensor(sensor_id)
        .await?
        .ok_or(ApiError::SensorNotFound(sensor_id))?;

    Ok(Json(sensor))
}

/// 重命名传感器
pub async fn rename_sensor(
    State(state): State<AppState>,
    Query(query): Query<RenameQuery>,
) -> Result<Json<Sensor>> {
    info!(sensor_id = %query.sensor_id, new_name = %query.new_name, "Renaming sensor");

    let sensor = state
        .store
        .rename_sensor(query.sensor_id, &query.new_name)
        .await?;
    Ok(Json(sensor))
}

/// 更新传感器阈值
pub async fn update_thresholds(
    State(state): State<AppState>,
    Path(sensor_id): Path<i32>,
    Json(req): Json<UpdateThresholdsRequest>,
) -> Result<Json<Sensor>> {
    info!(sensor_id = %sensor_id, "Updating sensor thresholds");

    let sensor = state
        .store
        .update_thresholds(sensor_id, req.into())
        .await?;
    Ok(Json(sensor))
}

/// 所有传感器最近若干天的湿度历史
pub async fn sensor_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>> {
    if !(1..=MAX_HISTORY_DAYS).contains(&query.days) {
        return Err(ApiError::ValidationError(format!(
            "days must be within 1..={}",
            MAX_HISTORY_DAYS
        )));
    }

    let mut sensors = state.store.all_sensors().await?;
    if sensors.is_empty() {
        return Err(ApiError::NoSensors);
    }

    sensors.sort_by_key(|s| s.id);

    let to = Utc::now();
    let from = to - Duration::days(query.days);
    debug!(days = query.days, "Building humidity history");

    let mut points: HashMap<i32, Vec<HistoryPoint>> = HashMap::new();
    for m in state.store.measurements_since(from).await? {
        points.entry(m.sensor_id).or_default().push(HistoryPoint {
            timestamp: m.date,
            humidity: m.humidity,
        });
    }

    let sensors = sensors
        .into_iter()
        .map(|sensor| SensorHistory {
            points: points.remove(&sensor.id).unwrap_or_default(),
            sensor_id: sensor.id,
            sensor_name: sensor.name,
        })
        .collect();

    Ok(Json(HistoryResponse { from, to, sensors }))
}

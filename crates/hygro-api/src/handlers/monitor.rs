use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use hygro_monitor::{CycleReport, MonitorStatus};
use tracing::info;

/// 监控服务状态
pub async fn monitor_status(State(state): State<AppState>) -> Json<MonitorStatus> {
    Json(state.monitor.status().await)
}

/// 启动监控（已运行时为空操作）
pub async fn start_monitor(State(state): State<AppState>) -> Json<MonitorStatus> {
    info!("Monitor start requested via API");
    state.monitor.start().await;
    Json(state.monitor.status().await)
}

/// 停止监控（未运行时为空操作）
pub async fn stop_monitor(State(state): State<AppState>) -> Json<MonitorStatus> {
    info!("Monitor stop requested via API");
    state.monitor.stop().await;
    Json(state.monitor.status().await)
}

/// 立即执行一次检查
pub async fn check_now(State(state): State<AppState>) -> Result<Json<CycleReport>> {
    let report = state.monitor.trigger_immediate_check().await?;
    Ok(Json(report))
}

use hygro_core::SensorStore;
use hygro_monitor::MonitorService;
use std::sync::Arc;

/// API 应用状态
#[derive(Clone)]
pub struct AppState {
    /// 传感器存储
    pub store: Arc<dyn SensorStore>,

    /// 湿度监控服务
    pub monitor: Arc<MonitorService>,
}

impl AppState {
    pub fn new(store: Arc<dyn SensorStore>, monitor: Arc<MonitorService>) -> Self {
        Self { store, monitor }
    }
}

use crate::config::MonitorConfig;
use crate::dedup::{AlertDeduplicator, AlertKey, AlertKind};
use crate::liveness::check_liveness;
use crate::threshold::evaluate_humidity;
use crate::{MonitorError, Result};
use chrono::{DateTime, Utc};
use hygro_core::SensorStore;
use hygro_notify::{AlertNotifier, Severity};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// 单次检查周期的统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// 判定为失联的传感器数
    pub stale_sensors: usize,

    /// 成功送达的失联告警数
    pub connection_alerts_sent: usize,

    /// 越过全局湿度上下限的传感器数
    pub humidity_breaches: usize,

    /// 成功送达的湿度告警数
    pub humidity_alerts_sent: usize,

    /// 因冷却期被抑制的告警数
    pub suppressed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdStatus {
    pub humidity_high: f64,
    pub humidity_low: f64,
    pub connection_minutes: i64,
}

/// 监控服务状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorStatus {
    pub running: bool,
    pub thresholds: ThresholdStatus,
    pub interval_seconds: u64,
    pub alert_cooldown_hours: i64,
}

pub struct MonitorTaskHandle {
    shutdown_tx: watch::Sender<bool>,
    join_handle: JoinHandle<()>,
}

impl MonitorTaskHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.join_handle.await;
    }

    fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }
}

/// 湿度监控服务
///
/// 后台循环定期执行失联检查与湿度检查，并按 (传感器, 告警类型) 去重后发送告警
pub struct MonitorService {
    /// 传感器存储（只读）
    store: Arc<dyn SensorStore>,

    /// 告警出口
    notifier: Arc<dyn AlertNotifier>,

    config: MonitorConfig,

    /// 去重状态；整个检查周期内持有，保证定时周期与手动检查串行
    dedup: Mutex<AlertDeduplicator>,

    /// 后台任务句柄
    task: Mutex<Option<MonitorTaskHandle>>,
}

impl MonitorService {
    pub fn new(
        store: Arc<dyn SensorStore>,
        notifier: Arc<dyn AlertNotifier>,
        config: MonitorConfig,
    ) -> Result<Self> {
        config.validate()?;
        info!(
            interval_secs = config.check_interval_secs,
            humidity_low = config.humidity_threshold_low,
            humidity_high = config.humidity_threshold_high,
            connection_minutes = config.connection_threshold_minutes,
            "Initializing humidity MonitorService"
        );

        Ok(Self {
            store,
            notifier,
            dedup: Mutex::new(AlertDeduplicator::new(config.alert_cooldown())),
            config,
            task: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// 启动后台监控循环；已在运行时仅记录警告
    ///
    /// 生命周期锁只在登记任务句柄时持有，启动通知在释放锁之后发送
    pub async fn start(self: &Arc<Self>) {
        {
            let mut task = self.task.lock().await;
            if task.as_ref().is_some_and(|t| !t.is_finished()) {
                warn!("Monitor already running, ignoring start request");
                return;
            }
            *task = Some(Arc::clone(self).spawn_loop());
        }
        info!("Humidity monitoring started");

        let message = format!(
            "Humidity monitor starting with thresholds: {}% - {}%",
            self.config.humidity_threshold_low, self.config.humidity_threshold_high
        );
        self.notifier
            .send_system_alert("Monitoring Started", &message, Severity::Info)
            .await;
    }

    /// 停止后台循环并等待其退出；未运行时仅记录警告
    pub async fn stop(&self) {
        let handle = self.task.lock().await.take();
        match handle {
            Some(handle) => {
                handle.shutdown().await;
                info!("Humidity monitoring stopped");
            }
            None => warn!("Monitor is not running, ignoring stop request"),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    pub async fn status(&self) -> MonitorStatus {
        MonitorStatus {
            running: self.is_running().await,
            thresholds: ThresholdStatus {
                humidity_high: self.config.humidity_threshold_high,
                humidity_low: self.config.humidity_threshold_low,
                connection_minutes: self.config.connection_threshold_minutes,
            },
            interval_seconds: self.config.check_interval_secs,
            alert_cooldown_hours: self.config.alert_cooldown_hours,
        }
    }

    /// 立即执行一次检查，错误返回给调用方
    pub async fn trigger_immediate_check(&self) -> Result<CycleReport> {
        info!("Manual humidity check triggered");
        self.run_check_at(Utc::now()).await
    }

    /// 以给定时间执行一次完整检查周期
    ///
    /// 失联检查与湿度检查互不阻塞，任一失败都会在两者结束后返回错误
    pub async fn run_check_at(&self, now: DateTime<Utc>) -> Result<CycleReport> {
        let mut dedup = self.dedup.lock().await;
        let mut report = CycleReport::default();

        let liveness = self.liveness_pass(&mut dedup, now, &mut report).await;
        let humidity = self.humidity_pass(&mut dedup, now, &mut report).await;

        match (liveness, humidity) {
            (Ok(()), Ok(())) => {
                debug!(report = ?report, "Check cycle completed");
                Ok(report)
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Err(a), Err(b)) => Err(MonitorError::CycleFailed(format!(
                "liveness pass: {}; humidity pass: {}",
                a, b
            ))),
        }
    }

    fn spawn_loop(self: Arc<Self>) -> MonitorTaskHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let interval = self.config.check_interval();

        let join_handle = tokio::spawn(async move {
            loop {
                let result = tokio::select! {
                    _ = wait_for_shutdown(&mut shutdown_rx) => break,
                    result = self.run_check_at(Utc::now()) => result,
                };

                if let Err(e) = result {
                    error!("Monitoring check failed: {}", e);
                    let message = format!("Monitoring service encountered an error: {}", e);
                    tokio::select! {
                        _ = wait_for_shutdown(&mut shutdown_rx) => break,
                        _ = self.notifier.send_system_alert("Monitor Error", &message, Severity::Critical) => {}
                    }
                }

                tokio::select! {
                    _ = wait_for_shutdown(&mut shutdown_rx) => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            debug!("Monitor loop exited");
        });

        MonitorTaskHandle {
            shutdown_tx,
            join_handle,
        }
    }

    async fn liveness_pass(
        &self,
        dedup: &mut AlertDeduplicator,
        now: DateTime<Utc>,
        report: &mut CycleReport,
    ) -> Result<()> {
        let threshold = self.config.connection_threshold();
        let stale = self.store.list_sensors_stale_since(now - threshold).await?;

        for sensor in stale {
            let Some(staleness) = check_liveness(sensor.last_connection, now, threshold) else {
                continue;
            };
            report.stale_sensors += 1;

            let key = AlertKey::new(sensor.id, AlertKind::ConnectionStale);
            if !dedup.should_fire(key, now) {
                debug!(sensor_id = sensor.id, "Connection alert suppressed by cooldown");
                report.suppressed += 1;
                continue;
            }

            let sent = self
                .notifier
                .send_connection_alert(
                    &sensor.name,
                    sensor.last_connection,
                    self.config.connection_threshold_minutes,
                    staleness.severity,
                )
                .await;

            if sent {
                dedup.mark_fired(key, now);
                report.connection_alerts_sent += 1;
                info!(
                    sensor_id = sensor.id,
                    elapsed_minutes = staleness.elapsed.num_minutes(),
                    "Connection alert sent"
                );
            } else {
                warn!(sensor_id = sensor.id, "Connection alert not delivered, will retry next cycle");
            }
        }

        Ok(())
    }

    async fn humidity_pass(
        &self,
        dedup: &mut AlertDeduplicator,
        now: DateTime<Utc>,
        report: &mut CycleReport,
    ) -> Result<()> {
        let thresholds = self.config.global_thresholds();
        let latest = self.store.latest_measurement_per_sensor().await?;

        for reading in latest {
            // 没有测量的传感器只参与失联检查
            let (Some(humidity), Some(timestamp)) = (reading.humidity, reading.timestamp) else {
                continue;
            };
            let Some(breach) = evaluate_humidity(humidity, &thresholds) else {
                continue;
            };
            report.humidity_breaches += 1;

            let key = AlertKey::new(reading.sensor_id, breach.kind);
            if !dedup.should_fire(key, now) {
                debug!(sensor_id = reading.sensor_id, kind = %breach.kind, "Humidity alert suppressed by cooldown");
                report.suppressed += 1;
                continue;
            }

            let sent = self
                .notifier
                .send_humidity_alert(
                    &reading.sensor_name,
                    humidity,
                    breach.threshold,
                    timestamp,
                    breach.severity,
                )
                .await;

            if sent {
                dedup.mark_fired(key, now);
                report.humidity_alerts_sent += 1;
                info!(
                    sensor_id = reading.sensor_id,
                    humidity = humidity,
                    severity = %breach.severity,
                    "Humidity alert sent"
                );
            } else {
                warn!(sensor_id = reading.sensor_id, "Humidity alert not delivered, will retry next cycle");
            }
        }

        Ok(())
    }
}

/// 等待停止信号；发送端被丢弃也视为停止
async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

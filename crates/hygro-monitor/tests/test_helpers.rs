#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hygro_core::{
    LatestReading, Measurement, NewMeasurement, Result, Sensor, SensorStore, SensorThresholds,
    StoreError,
};
use hygro_notify::{AlertNotifier, Severity};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// 内存中的传感器存储
#[derive(Default)]
pub struct FakeStore {
    sensors: Mutex<Vec<Sensor>>,
    readings: Mutex<Vec<(i32, f64, DateTime<Utc>)>>,
    fail_liveness: AtomicBool,
    fail_latest: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sensor(&self, sensor: Sensor) {
        self.sensors.lock().unwrap().push(sensor);
    }

    pub fn add_reading(&self, sensor_id: i32, humidity: f64, date: DateTime<Utc>) {
        self.readings.lock().unwrap().push((sensor_id, humidity, date));
    }

    pub fn set_fail_liveness(&self, fail: bool) {
        self.fail_liveness.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_latest(&self, fail: bool) {
        self.fail_latest.store(fail, Ordering::SeqCst);
    }

    fn unavailable() -> StoreError {
        StoreError::Other(anyhow::anyhow!("database unavailable"))
    }
}

#[async_trait]
impl SensorStore for FakeStore {
    async fn list_sensors(&self, skip: u64, limit: u64) -> Result<Vec<Sensor>> {
        Ok(self
            .sensors
            .lock()
            .unwrap()
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn all_sensors(&self) -> Result<Vec<Sensor>> {
        let mut sensors = self.sensors.lock().unwrap().clone();
        sensors.sort_by_key(|s| s.last_connection);
        Ok(sensors)
    }

    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>> {
        Ok(self
            .sensors
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == sensor_id)
            .cloned())
    }

    async fn rename_sensor(&self, sensor_id: i32, new_name: &str) -> Result<Sensor> {
        let mut sensors = self.sensors.lock().unwrap();
        let sensor = sensors
            .iter_mut()
            .find(|s| s.id == sensor_id)
            .ok_or(StoreError::NotFound(sensor_id))?;
        sensor.name = new_name.to_string();
        Ok(sensor.clone())
    }

    async fn update_thresholds(&self, sensor_id: i32, thresholds: SensorThresholds) -> Result<Sensor> {
        thresholds.validate()?;
        let mut sensors = self.sensors.lock().unwrap();
        let sensor = sensors
            .iter_mut()
            .find(|s| s.id == sensor_id)
            .ok_or(StoreError::NotFound(sensor_id))?;
        sensor.thresholds = thresholds;
        Ok(sensor.clone())
    }

    async fn record_measurement(&self, measurement: NewMeasurement) -> Result<Measurement> {
        let now = Utc::now();
        let mut readings = self.readings.lock().unwrap();
        readings.push((measurement.sensor_id, measurement.humidity, now));
        Ok(Measurement {
            id: readings.len() as i32,
            sensor_id: measurement.sensor_id,
            raw_value: measurement.raw_value,
            humidity: measurement.humidity,
            battery_voltage: measurement.battery_voltage,
            date: now,
        })
    }

    async fn list_measurements(&self, _sensor_id: i32, _skip: u64, _limit: u64) -> Result<Vec<Measurement>> {
        Ok(Vec::new())
    }

    async fn measurements_since(&self, _since: DateTime<Utc>) -> Result<Vec<Measurement>> {
        Ok(Vec::new())
    }

    async fn list_sensors_stale_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Sensor>> {
        if self.fail_liveness.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self
            .sensors
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.last_connection < cutoff)
            .cloned()
            .collect())
    }

    async fn latest_measurement_per_sensor(&self) -> Result<Vec<LatestReading>> {
        if self.fail_latest.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let readings = self.readings.lock().unwrap();
        Ok(self
            .sensors
            .lock()
            .unwrap()
            .iter()
            .map(|sensor| {
                let latest = readings.iter().rev().find(|(id, _, _)| *id == sensor.id);
                LatestReading {
                    sensor_id: sensor.id,
                    sensor_name: sensor.name.clone(),
                    humidity: latest.map(|(_, h, _)| *h),
                    timestamp: latest.map(|(_, _, d)| *d),
                }
            })
            .collect())
    }
}

/// 通知记录
#[derive(Debug, Clone, PartialEq)]
pub enum SentAlert {
    Humidity {
        sensor_name: String,
        humidity: f64,
        threshold: f64,
        severity: Severity,
    },
    Connection {
        sensor_name: String,
        threshold_minutes: i64,
        severity: Severity,
    },
    System {
        title: String,
        message: String,
        severity: Severity,
    },
}

/// 记录所有告警调用的通知器，可切换投递成功与否，可模拟慢速的系统告警
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentAlert>>,
    deliver: AtomicBool,
    system_delay_ms: AtomicU64,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            deliver: AtomicBool::new(true),
            system_delay_ms: AtomicU64::new(0),
        }
    }

    /// 系统告警在记录之后再等待这么久才返回
    pub fn set_system_delay(&self, delay: std::time::Duration) {
        self.system_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_deliver(&self, deliver: bool) {
        self.deliver.store(deliver, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentAlert> {
        self.sent.lock().unwrap().clone()
    }

    pub fn system_titles(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|alert| match alert {
                SentAlert::System { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn record(&self, alert: SentAlert) -> bool {
        self.sent.lock().unwrap().push(alert);
        self.deliver.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AlertNotifier for RecordingNotifier {
    async fn send_humidity_alert(
        &self,
        sensor_name: &str,
        humidity: f64,
        threshold: f64,
        _timestamp: DateTime<Utc>,
        severity: Severity,
    ) -> bool {
        self.record(SentAlert::Humidity {
            sensor_name: sensor_name.to_string(),
            humidity,
            threshold,
            severity,
        })
    }

    async fn send_connection_alert(
        &self,
        sensor_name: &str,
        _last_connection: DateTime<Utc>,
        threshold_minutes: i64,
        severity: Severity,
    ) -> bool {
        self.record(SentAlert::Connection {
            sensor_name: sensor_name.to_string(),
            threshold_minutes,
            severity,
        })
    }

    async fn send_system_alert(&self, title: &str, message: &str, severity: Severity) -> bool {
        let delivered = self.record(SentAlert::System {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        });
        let delay = self.system_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        delivered
    }
}

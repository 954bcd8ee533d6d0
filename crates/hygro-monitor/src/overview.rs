//! 概览文本
//!
//! `overview_text` 列出所有有数据的传感器；`check_text` 只保留值得告警的传感器。

use crate::liveness::contact_glyphs;
use crate::threshold::{classify_display, is_alert_worthy};
use chrono::{DateTime, Utc};
use hygro_core::{LatestReading, Sensor};
use std::collections::HashMap;
use std::fmt::Write;

/// 所有传感器的湿度概览
pub fn overview_text(sensors: &[Sensor], latest: &[LatestReading], now: DateTime<Utc>) -> String {
    render(sensors, latest, now, |_, _| true)
}

/// 仅包含高于溢出线或低于告警线的传感器
pub fn check_text(sensors: &[Sensor], latest: &[LatestReading], now: DateTime<Utc>) -> String {
    render(sensors, latest, now, |sensor, humidity| {
        is_alert_worthy(&sensor.thresholds, humidity)
    })
}

fn render<F>(sensors: &[Sensor], latest: &[LatestReading], now: DateTime<Utc>, include: F) -> String
where
    F: Fn(&Sensor, f64) -> bool,
{
    let readings: HashMap<i32, f64> = latest
        .iter()
        .filter_map(|r| r.humidity.map(|h| (r.sensor_id, h)))
        .collect();

    let mut text = String::new();
    for sensor in sensors {
        let Some(&humidity) = readings.get(&sensor.id) else {
            continue;
        };
        if !include(sensor, humidity) {
            continue;
        }

        let icon = classify_display(&sensor.thresholds, humidity).icon();
        let _ = writeln!(
            text,
            "{}{}: {:.1}% {}",
            sensor.name,
            contact_glyphs(sensor.last_connection, now),
            humidity,
            icon
        );
    }
    text
}

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 告警类型，每种类型按传感器独立去重
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    HumidityHigh,
    HumidityLow,
    ConnectionStale,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertKind::HumidityHigh => "humidity_high",
            AlertKind::HumidityLow => "humidity_low",
            AlertKind::ConnectionStale => "connection_stale",
        };
        f.write_str(s)
    }
}

/// 去重键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub sensor_id: i32,
    pub kind: AlertKind,
}

impl AlertKey {
    pub fn new(sensor_id: i32, kind: AlertKind) -> Self {
        Self { sensor_id, kind }
    }
}

/// 告警去重器
///
/// 只在进程内存中保存上次告警时间，重启后清空
#[derive(Debug)]
pub struct AlertDeduplicator {
    cooldown: Duration,
    last_fired: HashMap<AlertKey, DateTime<Utc>>,
}

impl AlertDeduplicator {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// 首次出现或距上次告警已满冷却期时返回 true
    pub fn should_fire(&self, key: AlertKey, now: DateTime<Utc>) -> bool {
        match self.last_fired.get(&key) {
            Some(last) => now - *last >= self.cooldown,
            None => true,
        }
    }

    /// 记录一次成功送达的告警；调用方只应在至少一个接收者成功后调用
    pub fn mark_fired(&mut self, key: AlertKey, now: DateTime<Utc>) {
        self.last_fired.insert(key, now);
    }

    pub fn last_fired(&self, key: AlertKey) -> Option<DateTime<Utc>> {
        self.last_fired.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_cooldown_window() {
        let mut dedup = AlertDeduplicator::new(Duration::hours(4));
        let key = AlertKey::new(1, AlertKind::HumidityLow);

        assert!(dedup.should_fire(key, t0()));
        dedup.mark_fired(key, t0());

        assert!(!dedup.should_fire(key, t0() + Duration::minutes(5)));
        assert!(!dedup.should_fire(key, t0() + Duration::hours(4) - Duration::seconds(1)));
        assert!(dedup.should_fire(key, t0() + Duration::hours(4)));
    }

    #[test]
    fn test_kinds_and_sensors_are_independent() {
        let mut dedup = AlertDeduplicator::new(Duration::hours(4));
        dedup.mark_fired(AlertKey::new(1, AlertKind::HumidityLow), t0());

        let later = t0() + Duration::minutes(1);
        assert!(dedup.should_fire(AlertKey::new(1, AlertKind::ConnectionStale), later));
        assert!(dedup.should_fire(AlertKey::new(1, AlertKind::HumidityHigh), later));
        assert!(dedup.should_fire(AlertKey::new(2, AlertKind::HumidityLow), later));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_unrecorded_fire_does_not_suppress() {
        let dedup = AlertDeduplicator::new(Duration::hours(4));
        let key = AlertKey::new(7, AlertKind::ConnectionStale);

        // 未调用 mark_fired（例如全部投递失败）时下一轮仍然告警
        assert!(dedup.should_fire(key, t0()));
        assert!(dedup.should_fire(key, t0() + Duration::minutes(5)));
        assert!(dedup.last_fired(key).is_none());
    }
}

//! 湿度阈值判定
//!
//! 两套策略刻意分开：
//! - [`classify_display`]：按传感器四级阈值分级，用于概览展示
//! - [`is_alert_worthy`]：只看最外侧两条阈值（溢出 / 告警下限），用于检查接口
//!
//! 告警循环使用全局上下限 [`GlobalThresholds`] 与 [`evaluate_humidity`]。

use crate::dedup::AlertKind;
use hygro_core::SensorThresholds;
use hygro_notify::Severity;
use serde::{Deserialize, Serialize};

/// 超过上限多少倍升级为严重
const HIGH_ESCALATION_FACTOR: f64 = 1.15;

/// 低于下限多少倍升级为严重
const LOW_ESCALATION_FACTOR: f64 = 0.85;

/// 四级湿度分级（展示用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HumidityLevel {
    WithinBounds,
    AboveOverflow,
    BelowAlert,
    BelowWarning,
    BelowCritical,
}

impl HumidityLevel {
    /// 概览中的图标
    pub fn icon(&self) -> &'static str {
        match self {
            HumidityLevel::AboveOverflow => "🤿",
            HumidityLevel::BelowCritical => "💀",
            HumidityLevel::BelowWarning => "🔥",
            HumidityLevel::BelowAlert => "🍂",
            HumidityLevel::WithinBounds => "🌿",
        }
    }
}

/// 按传感器阈值分级，最严重的优先
pub fn classify_display(thresholds: &SensorThresholds, humidity: f64) -> HumidityLevel {
    if humidity > thresholds.overflow_level as f64 {
        HumidityLevel::AboveOverflow
    } else if humidity < thresholds.critical_level as f64 {
        HumidityLevel::BelowCritical
    } else if humidity < thresholds.warning_level as f64 {
        HumidityLevel::BelowWarning
    } else if humidity < thresholds.alert_level as f64 {
        HumidityLevel::BelowAlert
    } else {
        HumidityLevel::WithinBounds
    }
}

/// 是否值得告警：高于溢出线或低于告警线
pub fn is_alert_worthy(thresholds: &SensorThresholds, humidity: f64) -> bool {
    humidity > thresholds.overflow_level as f64 || humidity < thresholds.alert_level as f64
}

/// 全局湿度上下限
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalThresholds {
    pub high: f64,
    pub low: f64,
}

/// 越界告警判定结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumidityBreach {
    pub kind: AlertKind,
    /// 被突破的那条阈值
    pub threshold: f64,
    pub severity: Severity,
}

/// 告警级别升级规则
pub fn escalate(humidity: f64, thresholds: &GlobalThresholds) -> Severity {
    if humidity > thresholds.high * HIGH_ESCALATION_FACTOR
        || humidity < thresholds.low * LOW_ESCALATION_FACTOR
    {
        Severity::Critical
    } else {
        Severity::Warning
    }
}

/// 判断读数是否越过全局上下限
pub fn evaluate_humidity(humidity: f64, thresholds: &GlobalThresholds) -> Option<HumidityBreach> {
    let (kind, threshold) = if humidity > thresholds.high {
        (AlertKind::HumidityHigh, thresholds.high)
    } else if humidity < thresholds.low {
        (AlertKind::HumidityLow, thresholds.low)
    } else {
        return None;
    };

    Some(HumidityBreach {
        kind,
        threshold,
        severity: escalate(humidity, thresholds),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor_thresholds() -> SensorThresholds {
        SensorThresholds::new(60, 30, 20, 10)
    }

    const GLOBAL: GlobalThresholds = GlobalThresholds { high: 70.0, low: 30.0 };

    #[test]
    fn test_classify_display_tiers() {
        let t = sensor_thresholds();
        assert_eq!(classify_display(&t, 61.0), HumidityLevel::AboveOverflow);
        assert_eq!(classify_display(&t, 60.0), HumidityLevel::WithinBounds);
        assert_eq!(classify_display(&t, 45.0), HumidityLevel::WithinBounds);
        assert_eq!(classify_display(&t, 29.9), HumidityLevel::BelowAlert);
        assert_eq!(classify_display(&t, 19.0), HumidityLevel::BelowWarning);
        assert_eq!(classify_display(&t, 8.0), HumidityLevel::BelowCritical);
    }

    #[test]
    fn test_overflow_wins_regardless_of_low_side_order() {
        // 低侧阈值乱序也不影响溢出判定
        let t = SensorThresholds::new(50, 90, 80, 95);
        assert_eq!(classify_display(&t, 55.0), HumidityLevel::AboveOverflow);

        let t = SensorThresholds::new(40, 10, 20, 30);
        for value in [40.5, 60.0, 99.0] {
            assert_eq!(classify_display(&t, value), HumidityLevel::AboveOverflow);
        }
    }

    #[test]
    fn test_below_critical_wins_over_warning_and_alert() {
        let t = sensor_thresholds();
        for value in [0.0, 5.0, 9.99] {
            assert_eq!(classify_display(&t, value), HumidityLevel::BelowCritical);
        }
    }

    #[test]
    fn test_alert_worthy_uses_outer_bounds_only() {
        let t = sensor_thresholds();
        assert!(is_alert_worthy(&t, 61.0));
        assert!(is_alert_worthy(&t, 29.0));
        assert!(is_alert_worthy(&t, 5.0));
        assert!(!is_alert_worthy(&t, 30.0));
        assert!(!is_alert_worthy(&t, 60.0));
    }

    #[test]
    fn test_escalation() {
        assert_eq!(escalate(70.0 * 1.2, &GLOBAL), Severity::Critical);
        assert_eq!(escalate(70.0 * 1.05, &GLOBAL), Severity::Warning);
        assert_eq!(escalate(30.0 * 0.8, &GLOBAL), Severity::Critical);
        assert_eq!(escalate(28.0, &GLOBAL), Severity::Warning);
    }

    #[test]
    fn test_evaluate_humidity() {
        assert_eq!(evaluate_humidity(50.0, &GLOBAL), None);
        assert_eq!(evaluate_humidity(70.0, &GLOBAL), None);

        let breach = evaluate_humidity(85.0, &GLOBAL).unwrap();
        assert_eq!(breach.kind, AlertKind::HumidityHigh);
        assert_eq!(breach.threshold, 70.0);
        assert_eq!(breach.severity, Severity::Critical);

        let breach = evaluate_humidity(8.0, &GLOBAL).unwrap();
        assert_eq!(breach.kind, AlertKind::HumidityLow);
        assert_eq!(breach.threshold, 30.0);
        assert_eq!(breach.severity, Severity::Critical);

        let breach = evaluate_humidity(27.0, &GLOBAL).unwrap();
        assert_eq!(breach.severity, Severity::Warning);
    }
}

use chrono::{DateTime, Duration, Utc};
use hygro_notify::Severity;

/// 超过多少小时后显示为失联
const DEAD_AFTER_HOURS: i64 = 4;

/// 失联判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    /// 距最后上报的时长
    pub elapsed: Duration,

    /// 失联告警恒为 Warning
    pub severity: Severity,
}

/// 距最后上报超过 `threshold` 视为失联
pub fn check_liveness(
    last_connection: DateTime<Utc>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> Option<Staleness> {
    let elapsed = now - last_connection;
    if elapsed > threshold {
        Some(Staleness {
            elapsed,
            severity: Severity::Warning,
        })
    } else {
        None
    }
}

/// 概览中跟在传感器名后的上报状态标记
///
/// 不足 1 小时为空；1-4 小时每小时一个 🤖；超过 4 小时显示 ☠️
pub fn contact_glyphs(last_connection: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - last_connection).num_hours();
    if hours > DEAD_AFTER_HOURS {
        " ☠️".to_string()
    } else if hours > 0 {
        format!(" ({})", "🤖".repeat(hours as usize))
    } else {
        String::new()
    }
}

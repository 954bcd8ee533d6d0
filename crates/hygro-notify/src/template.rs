use crate::message::{Severity, TemplateFields};
use crate::{NotifyError, Result};
use std::collections::HashMap;

pub const HUMIDITY_ALERT: &str = "humidity_alert";
pub const CONNECTION_ALERT: &str = "connection_alert";
pub const SYSTEM_ALERT: &str = "system_alert";
pub const CUSTOM: &str = "custom";

/// 渲染时自动注入的级别占位符
const LEVEL_FIELD: &str = "level";

/// 具名消息模板表
///
/// 占位符语法：`{name}`、`{name:.1f}`；`{{` 与 `}}` 转义为花括号。
/// 运维可在运行时注册新模板或覆盖内置模板。
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, String>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// 注册或覆盖模板
    pub fn register(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    /// 按名称渲染模板
    pub fn render(&self, name: &str, severity: Severity, fields: &TemplateFields) -> Result<String> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| NotifyError::TemplateNotFound(name.to_string()))?;

        let mut out = String::with_capacity(template.len() + 64);
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut placeholder = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        placeholder.push(inner);
                    }
                    if !closed {
                        return Err(malformed(name, "unclosed placeholder"));
                    }
                    out.push_str(&render_placeholder(name, &placeholder, severity, fields)?);
                }
                '}' => return Err(malformed(name, "unmatched '}'")),
                other => out.push(other),
            }
        }

        Ok(out)
    }
}

impl Default for TemplateRegistry {
    /// 内置模板
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(
            HUMIDITY_ALERT,
            "{level} *HUMIDITY ALERT* {level}\n\n\
             Sensor: *{sensor_name}*\n\
             Current humidity: *{humidity:.1f}%*\n\
             Threshold: {threshold:.1f}%\n\
             Last reading: {timestamp}\n\n\
             Please check the sensor and environment conditions.",
        );
        registry.register(
            CONNECTION_ALERT,
            "{level} *CONNECTION ALERT* {level}\n\n\
             Sensor: *{sensor_name}*\n\
             Last connection: *{last_connection}*\n\
             Threshold: {threshold} minutes\n\n\
             Sensor may be offline or experiencing connectivity issues.",
        );
        registry.register(
            SYSTEM_ALERT,
            "{level} *SYSTEM ALERT* {level}\n\n*{title}*\n\n{message}",
        );
        registry.register(CUSTOM, "{level} {message}");
        registry
    }
}

fn render_placeholder(
    template: &str,
    placeholder: &str,
    severity: Severity,
    fields: &TemplateFields,
) -> Result<String> {
    let (key, spec) = match placeholder.split_once(':') {
        Some((key, spec)) => (key.trim(), Some(spec.trim())),
        None => (placeholder.trim(), None),
    };

    if key.is_empty() {
        return Err(malformed(template, "empty placeholder"));
    }

    let precision = match spec {
        None | Some("") => None,
        Some(spec) => Some(parse_precision(spec).ok_or_else(|| {
            malformed(template, &format!("unsupported format spec '{}'", spec))
        })?),
    };

    if key == LEVEL_FIELD && !fields.contains_key(LEVEL_FIELD) {
        return Ok(severity.glyph().to_string());
    }

    fields
        .get(key)
        .map(|value| value.render(precision))
        .ok_or_else(|| NotifyError::MissingField {
            template: template.to_string(),
            field: key.to_string(),
        })
}

/// 解析 `.N` 或 `.Nf`
fn parse_precision(spec: &str) -> Option<usize> {
    let digits = spec.strip_prefix('.')?;
    let digits = digits.strip_suffix('f').unwrap_or(digits);
    digits.parse().ok()
}

fn malformed(template: &str, reason: &str) -> NotifyError {
    NotifyError::MalformedTemplate {
        template: template.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateValue;

    fn fields(pairs: &[(&str, TemplateValue)]) -> TemplateFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_humidity_alert() {
        let registry = TemplateRegistry::default();
        let text = registry
            .render(
                HUMIDITY_ALERT,
                Severity::Critical,
                &fields(&[
                    ("sensor_name", "cellar".into()),
                    ("humidity", 8.04.into()),
                    ("threshold", 30.0.into()),
                    ("timestamp", "2026-01-02 03:04:05 UTC".into()),
                ]),
            )
            .unwrap();

        assert!(text.starts_with("🚨 *HUMIDITY ALERT* 🚨"));
        assert!(text.contains("Sensor: *cellar*"));
        assert!(text.contains("Current humidity: *8.0%*"));
        assert!(text.contains("Threshold: 30.0%"));
        assert!(text.contains("Last reading: 2026-01-02 03:04:05 UTC"));
    }

    #[test]
    fn test_render_connection_alert() {
        let registry = TemplateRegistry::default();
        let text = registry
            .render(
                CONNECTION_ALERT,
                Severity::Warning,
                &fields(&[
                    ("sensor_name", "attic".into()),
                    ("last_connection", "2026-01-02 01:00:00 UTC".into()),
                    ("threshold", 30i64.into()),
                ]),
            )
            .unwrap();

        assert!(text.starts_with("⚠️ *CONNECTION ALERT* ⚠️"));
        assert!(text.contains("Threshold: 30 minutes"));
    }

    #[test]
    fn test_register_runtime_template() {
        let mut registry = TemplateRegistry::default();
        registry.register("battery_low", "{level} {sensor_name}: {voltage:.2}V {{low}}");

        let text = registry
            .render(
                "battery_low",
                Severity::Warning,
                &fields(&[("sensor_name", "porch".into()), ("voltage", 2.7.into())]),
            )
            .unwrap();
        assert_eq!(text, "⚠️ porch: 2.70V {low}");
        assert!(registry.names().contains(&"battery_low".to_string()));
    }

    #[test]
    fn test_override_builtin_template() {
        let mut registry = TemplateRegistry::default();
        registry.register(CUSTOM, "[{level}] {message}");
        let text = registry
            .render(CUSTOM, Severity::Info, &fields(&[("message", "hi".into())]))
            .unwrap();
        assert_eq!(text, "[ℹ️] hi");
    }

    #[test]
    fn test_render_errors() {
        let mut registry = TemplateRegistry::default();

        let err = registry
            .render("nope", Severity::Info, &TemplateFields::new())
            .unwrap_err();
        assert!(matches!(err, NotifyError::TemplateNotFound(_)));

        let err = registry
            .render(SYSTEM_ALERT, Severity::Info, &fields(&[("title", "t".into())]))
            .unwrap_err();
        assert!(matches!(err, NotifyError::MissingField { ref field, .. } if field == "message"));

        registry.register("broken", "{level");
        let err = registry
            .render("broken", Severity::Info, &TemplateFields::new())
            .unwrap_err();
        assert!(matches!(err, NotifyError::MalformedTemplate { .. }));
    }
}

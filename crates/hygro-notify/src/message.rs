use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 告警级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// 信息
    Info,
    /// 警告
    Warning,
    /// 严重
    Critical,
    /// 成功/恢复
    Success,
}

impl Severity {
    /// 消息中显示的图标
    pub fn glyph(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ️",
            Severity::Warning => "⚠️",
            Severity::Critical => "🚨",
            Severity::Success => "✅",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// 模板占位符取值
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    Text(String),
    Float(f64),
    Integer(i64),
}

impl TemplateValue {
    /// 按占位符的格式说明渲染，目前只支持定点小数 `.N` / `.Nf`
    pub(crate) fn render(&self, precision: Option<usize>) -> String {
        match (self, precision) {
            (TemplateValue::Float(v), Some(p)) => format!("{:.*}", p, v),
            (TemplateValue::Integer(v), Some(p)) => format!("{:.*}", p, *v as f64),
            (TemplateValue::Float(v), None) => v.to_string(),
            (TemplateValue::Integer(v), None) => v.to_string(),
            (TemplateValue::Text(s), _) => s.clone(),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Text(value)
    }
}

impl From<f64> for TemplateValue {
    fn from(value: f64) -> Self {
        TemplateValue::Float(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        TemplateValue::Integer(value)
    }
}

impl From<i32> for TemplateValue {
    fn from(value: i32) -> Self {
        TemplateValue::Integer(value as i64)
    }
}

/// 模板参数
pub type TemplateFields = HashMap<String, TemplateValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_glyphs() {
        assert_eq!(Severity::Info.glyph(), "ℹ️");
        assert_eq!(Severity::Warning.glyph(), "⚠️");
        assert_eq!(Severity::Critical.glyph(), "🚨");
        assert_eq!(Severity::Success.to_string(), "✅");
    }

    #[test]
    fn test_value_precision() {
        assert_eq!(TemplateValue::Float(72.456).render(Some(1)), "72.5");
        assert_eq!(TemplateValue::Integer(30).render(Some(1)), "30.0");
        assert_eq!(TemplateValue::Integer(30).render(None), "30");
        assert_eq!(TemplateValue::from("x").render(Some(2)), "x");
    }
}

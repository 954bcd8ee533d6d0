use thiserror::Error;

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 模板不存在
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// 模板占位符缺少取值
    #[error("Template '{template}' is missing field '{field}'")]
    MissingField { template: String, field: String },

    /// 模板语法错误
    #[error("Malformed template '{template}': {reason}")]
    MalformedTemplate { template: String, reason: String },
}

pub type Result<T> = std::result::Result<T, NotifyError>;

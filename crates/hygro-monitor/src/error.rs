use hygro_core::StoreError;
use thiserror::Error;

/// 监控引擎错误类型
#[derive(Error, Debug)]
pub enum MonitorError {
    /// 数据访问失败
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// 配置无效
    #[error("Invalid monitor config: {0}")]
    InvalidConfig(String),

    /// 检查周期中多个阶段失败
    #[error("Check cycle failed: {0}")]
    CycleFailed(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

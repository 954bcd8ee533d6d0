use thiserror::Error;

/// 数据访问错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    /// 传感器未找到
    #[error("Sensor not found: {0}")]
    NotFound(i32),

    /// 验证错误
    #[error("Validation error: {0}")]
    Validation(String),

    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// 其他错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 数据访问结果类型
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// 创建验证错误
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }
}

// ==========================================
// 车辆段股道排程系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把引擎/配置错误转换为调用方可理解的拒绝原因
// 红线: 每个变更调用只返回成功或明确的拒绝原因，不吞错误
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::types::TrainId;
use crate::engine::error::EngineError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 校验错误（拒绝变更）
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("车辆段不存在: {0}")]
    UnknownDepot(String),

    #[error("重复预订: 列车{name}在 {arrival} ~ {departure} 已有重叠预订")]
    DuplicateBooking {
        name: String,
        arrival: String,
        departure: String,
    },

    #[error("车辆段已存在: {0}")]
    DepotAlreadyExists(String),

    // ==========================================
    // 结构性错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("没有可撤销的操作")]
    NothingToUndo,

    // ==========================================
    // 并发 / 内部错误
    // ==========================================
    #[error("锁获取失败: {0}")]
    LockPoisoned(String),

    #[error("引擎错误: {0}")]
    Engine(EngineError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn train_not_found(id: TrainId) -> Self {
        ApiError::NotFound(format!("列车不存在: train_id={}", id))
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::TrainNotFound(id) => ApiError::train_not_found(id),
            EngineError::DepotNotFound(name) => ApiError::UnknownDepot(name),
            other => ApiError::Engine(other),
        }
    }
}

// ==========================================
// 从 ConfigError 转换
// ==========================================
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(msg) => ApiError::InvalidInput(msg),
            other => ApiError::Other(anyhow::Error::new(other)),
        }
    }
}

/// API层Result类型
pub type ApiResult<T> = Result<T, ApiError>;

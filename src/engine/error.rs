// ==========================================
// 车辆段股道排程系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 无法安置的列车不是错误（记为无限期等待）
// ==========================================

use crate::domain::types::TrainId;
use thiserror::Error;

/// 引擎层结构性错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("车辆段不存在: train_id={train_id}, depot={depot}")]
    UnknownDepot { train_id: TrainId, depot: String },

    #[error("车辆段不存在: {0}")]
    DepotNotFound(String),

    #[error("列车不存在: train_id={0}")]
    TrainNotFound(TrainId),
}

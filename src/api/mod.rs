// ==========================================
// 车辆段股道排程系统 - API 层
// ==========================================
// 职责: 对外暴露排程操作，负责加锁、校验与错误转换
// ==========================================

pub mod dto;
pub mod error;
pub mod scheduler_api;
pub mod validator;

// 重导出核心类型
pub use dto::{DepotSnapshot, DepotSummary, LocalPlacement, TrainOccupation, TrainTimeline};
pub use error::{ApiError, ApiResult};
pub use scheduler_api::SchedulerApi;
pub use validator::TrainValidator;

// ==========================================
// 车辆段股道排程系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含引擎逻辑
// ==========================================

pub mod depot;
pub mod history;
pub mod train;
pub mod types;

// 重导出核心类型
pub use depot::{Depot, DepotRegistry, GeoPoint, Occupation, OccupationLedger, Track};
pub use history::{History, HistoryEntry, TrainSnapshot};
pub use train::{Train, TrainSpec, WaitingWindow};
pub use types::{LocomotiveSide, TrainCategory, TrainId, LOCOMOTIVE_LENGTH_M, WAGON_LENGTH_M};

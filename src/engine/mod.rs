// ==========================================
// 车辆段股道排程系统 - 引擎层
// ==========================================
// 职责: 股道查找 / 全量重算 / 全局试算 / 撤销 / 统计
// 红线: 引擎同步、单线程、确定性；并发由 API 层加锁保证
// ==========================================

pub mod error;
pub mod events;
pub mod global_optimizer;
pub mod placement;
pub mod recalc;
pub mod stats;
pub mod undo;

// 重导出核心引擎
pub use error::EngineError;
pub use events::{
    NoOpEventPublisher, OptionalEventPublisher, ScheduleEvent, ScheduleEventPublisher,
    ScheduleEventType,
};
pub use global_optimizer::{GlobalOptimizer, GlobalPlacement};
pub use placement::{PlacementSearch, TrackSlot};
pub use recalc::{RecalcEngine, RecalcResult};
pub use stats::{
    DailyRequirement, DepotStatistics, OccupancyRecord, SchedulerStatistics, StatisticsEngine,
};
pub use undo::{UndoEngine, UndoOutcome};

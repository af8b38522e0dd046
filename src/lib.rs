// ==========================================
// 车辆段股道排程系统 - 核心库
// ==========================================
// 职责: 多车辆段股道分配（容量 + 安全间隔）、全量重算、全局试算、撤销
// 系统定位: 确定性贪心排程，不做全局最优搜索
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排程规则
pub mod engine;

// 配置层 - 车辆段目录与安全间隔
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LocomotiveSide, TrainCategory, TrainId};

// 领域实体
pub use domain::{Depot, DepotRegistry, HistoryEntry, Occupation, Track, Train, TrainSpec};

// 引擎
pub use engine::{
    GlobalOptimizer, PlacementSearch, RecalcEngine, RecalcResult, StatisticsEngine, UndoEngine,
};

// API
pub use api::{ApiError, ApiResult, SchedulerApi};

// 配置
pub use config::{DepotConfig, SchedulerConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车辆段股道排程系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

// ==========================================
// 车辆段股道排程系统 - 应用层
// ==========================================
// 职责: 组装配置与排程API，供入口程序使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_config_path, AppState};

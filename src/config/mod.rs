// ==========================================
// 车辆段股道排程系统 - 配置层
// ==========================================
// 职责: 安全间隔与车辆段目录的加载、校验
// 来源: 环境变量 / 用户配置目录 / 内置默认
// ==========================================

pub mod depot_directory;
pub mod error;
pub mod scheduler_config;

pub use depot_directory::{
    load_config, DepotDirectoryReader, JsonFileDepotDirectory, StaticDepotDirectory,
};
pub use error::ConfigError;
pub use scheduler_config::{
    default_config_path, default_depots, DepotConfig, SchedulerConfig, CONFIG_ENV_VAR,
    DEFAULT_SAFETY_MARGIN_MINUTES, MAX_SAFETY_MARGIN_MINUTES,
};

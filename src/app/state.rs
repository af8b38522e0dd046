// ==========================================
// 车辆段股道排程系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;

use crate::api::{ApiResult, SchedulerApi};
use crate::config::{
    default_config_path, load_config, DepotDirectoryReader, SchedulerConfig, CONFIG_ENV_VAR,
};
use crate::engine::ScheduleEventPublisher;

/// 应用状态
///
/// 包含共享的排程API与启动时使用的配置
pub struct AppState {
    /// 排程API（内部自带互斥锁，可跨线程共享）
    pub scheduler_api: Arc<SchedulerApi>,

    /// 启动配置
    pub config: SchedulerConfig,
}

impl AppState {
    /// 从配置创建AppState
    ///
    /// # 返回
    /// - Err(ApiError::InvalidInput): 配置校验失败
    pub fn from_config(config: SchedulerConfig) -> ApiResult<Self> {
        Self::build(config, None)
    }

    /// 从配置创建AppState，并挂接事件发布者
    pub fn with_event_publisher(
        config: SchedulerConfig,
        publisher: Arc<dyn ScheduleEventPublisher>,
    ) -> ApiResult<Self> {
        Self::build(config, Some(publisher))
    }

    /// 通过车辆段目录读取器异步创建AppState
    pub async fn from_directory(reader: &dyn DepotDirectoryReader) -> ApiResult<Self> {
        let config = load_config(reader).await?;
        Self::build(config, None)
    }

    fn build(
        config: SchedulerConfig,
        publisher: Option<Arc<dyn ScheduleEventPublisher>>,
    ) -> ApiResult<Self> {
        tracing::info!(
            "初始化AppState: 车辆段{}个, 安全间隔{}分钟",
            config.depots.len(),
            config.safety_margin_minutes
        );

        let mut api = SchedulerApi::from_config(&config)?;
        if let Some(publisher) = publisher {
            api = api.with_event_publisher(publisher);
        }

        Ok(Self {
            scheduler_api: Arc::new(api),
            config,
        })
    }
}

/// 获取默认配置文件路径
///
/// 优先使用环境变量 DEPOT_APS_CONFIG，其次为用户配置目录
pub fn get_default_config_path() -> String {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    default_config_path()
        .unwrap_or_else(|| std::path::PathBuf::from("./depot-aps.json"))
        .to_string_lossy()
        .to_string()
}

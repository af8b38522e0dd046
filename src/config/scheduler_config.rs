// ==========================================
// 车辆段股道排程系统 - 排程配置
// ==========================================
// 职责: 安全间隔 + 车辆段目录的加载、校验与默认值
// 来源优先级: 环境变量指定文件 > 用户配置目录 > 内置默认
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::depot::{Depot, DepotRegistry, GeoPoint, Track};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV_VAR: &str = "DEPOT_APS_CONFIG";

/// 默认安全间隔（分钟）
pub const DEFAULT_SAFETY_MARGIN_MINUTES: i64 = 10;

/// 安全间隔上限（分钟，7天）
pub const MAX_SAFETY_MARGIN_MINUTES: i64 = 7 * 24 * 60;

// ==========================================
// DepotConfig - 车辆段定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotConfig {
    pub name: String,
    pub track_numbers: Vec<u32>,
    pub track_lengths: Vec<u32>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl DepotConfig {
    pub fn new(name: &str, track_numbers: Vec<u32>, track_lengths: Vec<u32>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            track_numbers,
            track_lengths,
            lat: Some(lat),
            lon: Some(lon),
        }
    }

    /// 校验车辆段定义
    ///
    /// # 规则
    /// - 名称非空
    /// - 至少一条股道，编号与长度数量一致
    /// - 股道长度 > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("车辆段名称不能为空".to_string()));
        }
        if self.track_numbers.is_empty() {
            return Err(ConfigError::Invalid(format!("车辆段{}没有股道", self.name)));
        }
        if self.track_numbers.len() != self.track_lengths.len() {
            return Err(ConfigError::Invalid(format!(
                "车辆段{}股道编号数({})与长度数({})不一致",
                self.name,
                self.track_numbers.len(),
                self.track_lengths.len()
            )));
        }
        if self.track_lengths.iter().any(|len| *len == 0) {
            return Err(ConfigError::Invalid(format!("车辆段{}存在长度为0的股道", self.name)));
        }
        Ok(())
    }

    pub fn location(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
            _ => None,
        }
    }

    pub fn to_depot(&self) -> Depot {
        let tracks = self
            .track_numbers
            .iter()
            .zip(&self.track_lengths)
            .map(|(number, length)| Track::new(*number, *length))
            .collect();
        Depot::new(self.name.clone(), tracks, self.location())
    }
}

// ==========================================
// SchedulerConfig - 排程配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_safety_margin_minutes")]
    pub safety_margin_minutes: i64,
    #[serde(default = "default_depots")]
    pub depots: Vec<DepotConfig>,
}

fn default_safety_margin_minutes() -> i64 {
    DEFAULT_SAFETY_MARGIN_MINUTES
}

/// 内置车辆段目录
pub fn default_depots() -> Vec<DepotConfig> {
    vec![
        DepotConfig::new("Glostrup", vec![7, 8, 9, 11], vec![290, 340, 400, 300], 55.662194, 12.393508),
        DepotConfig::new("Naestved", vec![1, 2, 3, 4], vec![250, 300, 350, 280], 55.194538, 11.822616),
        DepotConfig::new("Taulov", vec![21], vec![280], 55.546012, 9.632929),
        DepotConfig::new("KAC", vec![22], vec![280], 55.624757, 12.680361),
        DepotConfig::new("Helgoland", vec![23], vec![280], 55.714857, 12.582771),
        DepotConfig::new("Padborg", vec![24], vec![280], 54.824899, 9.357716),
        DepotConfig::new("Langenfelde", vec![25], vec![280], 53.581551, 9.924246),
        DepotConfig::new("LMII", vec![26, 27], vec![280, 300], 40.537568, -3.887422),
        DepotConfig::new("Hendaya", vec![28], vec![320], 43.348556, -1.788629),
        DepotConfig::new("Rivabellosa", vec![29], vec![250], 42.699047, -2.917172),
        DepotConfig::new("KVO (CPH)", vec![30, 31], vec![300, 280], 55.662953, 12.546617),
        DepotConfig::new("Elsinore", vec![32], vec![270], 56.030817, 12.608929),
    ]
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            safety_margin_minutes: DEFAULT_SAFETY_MARGIN_MINUTES,
            depots: default_depots(),
        }
    }
}

impl SchedulerConfig {
    pub fn new(safety_margin_minutes: i64, depots: Vec<DepotConfig>) -> Self {
        Self {
            safety_margin_minutes,
            depots,
        }
    }

    /// 安全间隔；未经校验的配置按 [0, MAX_SAFETY_MARGIN_MINUTES] 截断
    pub fn safety_margin(&self) -> Duration {
        Duration::minutes(self.safety_margin_minutes.clamp(0, MAX_SAFETY_MARGIN_MINUTES))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.safety_margin_minutes < 0 {
            return Err(ConfigError::Invalid(format!(
                "安全间隔不能为负: {}",
                self.safety_margin_minutes
            )));
        }
        if self.safety_margin_minutes > MAX_SAFETY_MARGIN_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "安全间隔超出上限: {} > {}",
                self.safety_margin_minutes, MAX_SAFETY_MARGIN_MINUTES
            )));
        }
        let mut seen = HashSet::new();
        for depot in &self.depots {
            depot.validate()?;
            if !seen.insert(depot.name.as_str()) {
                return Err(ConfigError::Invalid(format!("车辆段名称重复: {}", depot.name)));
            }
        }
        Ok(())
    }

    /// 构建车辆段目录（保持配置顺序）
    pub fn build_registry(&self) -> Result<DepotRegistry, ConfigError> {
        self.validate()?;
        let mut registry = DepotRegistry::new();
        for depot in &self.depots {
            registry
                .insert(depot.to_depot())
                .map_err(|d| ConfigError::Invalid(format!("车辆段名称重复: {}", d.name())))?;
        }
        Ok(registry)
    }

    // ==========================================
    // 加载
    // ==========================================

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// 按优先级加载配置
    ///
    /// 1. 环境变量 DEPOT_APS_CONFIG 指定的文件（必须可读）
    /// 2. 用户配置目录下的 depot-aps/config.json（存在时）
    /// 3. 内置默认
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                tracing::info!("使用环境变量指定的配置: {}", trimmed);
                return Self::from_json_file(trimmed);
            }
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                tracing::info!("使用用户配置: {}", path.display());
                return Self::from_json_file(&path);
            }
        }

        tracing::info!("未找到配置文件，使用内置默认配置");
        Ok(Self::default())
    }
}

/// 用户配置目录下的默认配置路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("depot-aps").join("config.json"))
}

// ==========================================
// 车辆段股道排程系统 - 车辆段目录读取 Trait
// ==========================================
// 职责: 定义启动时读取车辆段目录与安全间隔的接口
// 实现者: StaticDepotDirectory（内存）/ JsonFileDepotDirectory（JSON 文件）
// 红线: 只读，不包含排程逻辑
// ==========================================

use crate::config::error::ConfigError;
use crate::config::scheduler_config::{DepotConfig, SchedulerConfig};
use async_trait::async_trait;
use std::path::PathBuf;

// ==========================================
// DepotDirectoryReader Trait
// ==========================================
#[async_trait]
pub trait DepotDirectoryReader: Send + Sync {
    /// 获取车辆段列表（顺序即目录顺序，影响跨段平局）
    async fn list_depots(&self) -> Result<Vec<DepotConfig>, ConfigError>;

    /// 获取安全间隔（分钟）
    ///
    /// # 默认值
    /// - 10
    async fn safety_margin_minutes(&self) -> Result<i64, ConfigError>;
}

/// 通过 reader 组装完整配置并校验
pub async fn load_config(reader: &dyn DepotDirectoryReader) -> Result<SchedulerConfig, ConfigError> {
    let config = SchedulerConfig::new(
        reader.safety_margin_minutes().await?,
        reader.list_depots().await?,
    );
    config.validate()?;
    Ok(config)
}

// ==========================================
// StaticDepotDirectory - 内存目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StaticDepotDirectory {
    config: SchedulerConfig,
}

impl StaticDepotDirectory {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DepotDirectoryReader for StaticDepotDirectory {
    async fn list_depots(&self) -> Result<Vec<DepotConfig>, ConfigError> {
        Ok(self.config.depots.clone())
    }

    async fn safety_margin_minutes(&self) -> Result<i64, ConfigError> {
        Ok(self.config.safety_margin_minutes)
    }
}

// ==========================================
// JsonFileDepotDirectory - JSON 文件目录
// ==========================================
// 每次调用都重新读取文件
#[derive(Debug, Clone)]
pub struct JsonFileDepotDirectory {
    path: PathBuf,
}

impl JsonFileDepotDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<SchedulerConfig, ConfigError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConfigError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl DepotDirectoryReader for JsonFileDepotDirectory {
    async fn list_depots(&self) -> Result<Vec<DepotConfig>, ConfigError> {
        Ok(self.read().await?.depots)
    }

    async fn safety_margin_minutes(&self) -> Result<i64, ConfigError> {
        Ok(self.read().await?.safety_margin_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_static_directory_defaults() {
        let reader = StaticDepotDirectory::default();
        let config = load_config(&reader).await.unwrap();
        assert_eq!(config.safety_margin_minutes, 10);
        assert_eq!(config.depots.first().map(|d| d.name.as_str()), Some("Glostrup"));
    }

    #[tokio::test]
    async fn test_json_file_directory() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"safety_margin_minutes": 0, "depots": [{{"name": "X", "track_numbers": [5], "track_lengths": [150]}}]}}"#
        )
        .unwrap();

        let reader = JsonFileDepotDirectory::new(file.path());
        assert_eq!(reader.safety_margin_minutes().await.unwrap(), 0);
        let config = load_config(&reader).await.unwrap();
        assert_eq!(config.depots.len(), 1);
        assert_eq!(config.depots[0].name, "X");
    }

    #[tokio::test]
    async fn test_invalid_directory_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"depots": [{{"name": "X", "track_numbers": [5, 6], "track_lengths": [150]}}]}}"#
        )
        .unwrap();

        let reader = JsonFileDepotDirectory::new(file.path());
        assert!(matches!(load_config(&reader).await, Err(ConfigError::Invalid(_))));

        let missing = JsonFileDepotDirectory::new("/nonexistent/depots.json");
        assert!(matches!(missing.list_depots().await, Err(ConfigError::Io { .. })));
    }
}

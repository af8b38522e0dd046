// ==========================================
// 车辆段股道排程系统 - 领域类型定义
// ==========================================
// 职责: 列车类别、机车位置等枚举与长度常量
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 列车ID（单调递增分配，永不复用）
pub type TrainId = u64;

/// 单节车厢长度（米）
pub const WAGON_LENGTH_M: u32 = 14;

/// 单台机车长度（米）
pub const LOCOMOTIVE_LENGTH_M: u32 = 19;

// ==========================================
// 列车类别 (Train Category)
// ==========================================
// 序列化格式: lowercase (storage / testing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainCategory {
    #[default]
    Storage, // 存放
    Testing, // 试验
}

impl fmt::Display for TrainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainCategory::Storage => write!(f, "storage"),
            TrainCategory::Testing => write!(f, "testing"),
        }
    }
}

impl TrainCategory {
    /// 从字符串解析类别（未知值回落为 Storage）
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "testing" => TrainCategory::Testing,
            _ => TrainCategory::Storage,
        }
    }
}

// ==========================================
// 无机车一侧 (Side Without Locomotive)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocomotiveSide {
    #[default]
    Left,
    Right,
}

impl fmt::Display for LocomotiveSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocomotiveSide::Left => write!(f, "left"),
            LocomotiveSide::Right => write!(f, "right"),
        }
    }
}

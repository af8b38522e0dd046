// ==========================================
// 车辆段股道排程系统 - API 输出结构
// ==========================================
// 职责: 只读查询的返回结构（由调用方决定序列化格式）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::depot::{Depot, GeoPoint, Occupation, Track};
use crate::domain::train::{Train, WaitingWindow};
use crate::domain::types::TrainId;

/// 车辆段快照：股道、容量、当前占用、申请该车辆段的列车
#[derive(Debug, Clone, Serialize)]
pub struct DepotSnapshot {
    pub name: String,
    pub tracks: Vec<Track>,
    pub occupations: Vec<Occupation>,
    pub trains: Vec<Train>,
    pub location: Option<GeoPoint>,
}

impl DepotSnapshot {
    pub fn capture(depot: &Depot, trains: &[Train]) -> Self {
        Self {
            name: depot.name().to_string(),
            tracks: depot.tracks().to_vec(),
            occupations: depot.ledger().entries().to_vec(),
            trains: trains
                .iter()
                .filter(|t| t.depot() == depot.name())
                .cloned()
                .collect(),
            location: depot.location(),
        }
    }
}

/// 本地安置结果（重算输出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPlacement {
    pub train_id: TrainId,
    pub name: String,
    pub depot: String,
    pub track: Option<u32>,
    pub start: Option<NaiveDateTime>, // 无限期等待时为 None
    pub waiting: bool,
}

impl From<&Train> for LocalPlacement {
    fn from(train: &Train) -> Self {
        Self {
            train_id: train.id,
            name: train.name().to_string(),
            depot: train.depot().to_string(),
            track: train.track,
            start: train.track.and(train.waiting_window.end),
            waiting: train.waiting,
        }
    }
}

/// 车辆段概要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotSummary {
    pub name: String,
    pub track_count: usize,
    pub location: Option<GeoPoint>,
}

impl From<&Depot> for DepotSummary {
    fn from(depot: &Depot) -> Self {
        Self {
            name: depot.name().to_string(),
            track_count: depot.tracks().len(),
            location: depot.location(),
        }
    }
}

/// 单列车的占用区间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainOccupation {
    pub depot: String,
    pub track: u32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// 单列车的占用明细 + 等待窗口（仅在等待时给出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTimeline {
    pub train_id: TrainId,
    pub occupations: Vec<TrainOccupation>,
    pub waiting_window: Option<WaitingWindow>,
}

// ==========================================
// 车辆段股道排程系统 - 车辆段/股道领域模型
// ==========================================
// 职责: 股道容量模型 + 占用台账 + 车辆段目录
// 红线: 股道容量在车辆段创建后不可修改
// ==========================================

use crate::domain::types::TrainId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Track - 股道
// ==========================================
// 由车辆段内位置（索引）标识，编号仅用于展示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Track {
    number: u32,
    capacity_m: u32,
}

impl Track {
    pub fn new(number: u32, capacity_m: u32) -> Self {
        Self { number, capacity_m }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn capacity_m(&self) -> u32 {
        self.capacity_m
    }
}

/// 地理坐标（排程引擎不使用，仅透传）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

// ==========================================
// Occupation - 占用区间
// ==========================================
// 不变量: end == 对应列车的出发时刻
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupation {
    pub track_index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub train_id: TrainId,
}

impl Occupation {
    /// 时刻是否落在占用区间内（两端闭合）
    pub fn covers(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

// ==========================================
// OccupationLedger - 占用台账
// ==========================================
// 只允许重算引擎与全局优化器（私有副本）追加
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OccupationLedger {
    entries: Vec<Occupation>,
}

impl OccupationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Occupation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, occupation: Occupation) {
        self.entries.push(occupation);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// 某条股道上的占用区间，按开始时刻升序
    pub fn intervals_on_track(&self, track_index: usize) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        let mut intervals: Vec<_> = self
            .entries
            .iter()
            .filter(|occ| occ.track_index == track_index)
            .map(|occ| (occ.start, occ.end))
            .collect();
        intervals.sort_by_key(|(start, _)| *start);
        intervals
    }

    /// 累计占用分钟数
    pub fn occupied_minutes(&self) -> i64 {
        self.entries.iter().map(Occupation::minutes).sum()
    }
}

// ==========================================
// Depot - 车辆段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Depot {
    name: String,
    tracks: Vec<Track>,
    ledger: OccupationLedger,
    location: Option<GeoPoint>,
}

impl Depot {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>, location: Option<GeoPoint>) -> Self {
        Self {
            name: name.into(),
            tracks,
            ledger: OccupationLedger::new(),
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    pub fn ledger(&self) -> &OccupationLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut OccupationLedger {
        &mut self.ledger
    }

    /// 复制容量模型，台账置空（供全局优化器模拟）
    pub fn with_empty_ledger(&self) -> Self {
        Self {
            name: self.name.clone(),
            tracks: self.tracks.clone(),
            ledger: OccupationLedger::new(),
            location: self.location,
        }
    }
}

// ==========================================
// DepotRegistry - 车辆段目录
// ==========================================
// 按名称唯一、保持插入顺序（全局优化器的跨段平局依赖该顺序）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepotRegistry {
    depots: Vec<Depot>,
}

impl DepotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入车辆段；同名已存在时原样返回
    pub fn insert(&mut self, depot: Depot) -> Result<(), Depot> {
        if self.contains(depot.name()) {
            return Err(depot);
        }
        self.depots.push(depot);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.depots.iter().any(|d| d.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Depot> {
        self.depots.iter().find(|d| d.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Depot> {
        self.depots.iter_mut().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Depot> {
        self.depots.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Depot> {
        self.depots.iter_mut()
    }

    pub fn names(&self) -> Vec<String> {
        self.depots.iter().map(|d| d.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.depots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depots.is_empty()
    }

    /// 所有车辆段的空台账副本
    pub fn cloned_empty(&self) -> Self {
        Self {
            depots: self.depots.iter().map(Depot::with_empty_ledger).collect(),
        }
    }
}

// ==========================================
// 车辆段股道排程系统 - 列车领域模型
// ==========================================
// 职责: 列车实体、录入参数、等待窗口
// 红线: 长度由车厢/机车数推导，不可单独写入
// ==========================================

use crate::domain::types::{
    LocomotiveSide, TrainCategory, TrainId, LOCOMOTIVE_LENGTH_M, WAGON_LENGTH_M,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// TrainSpec - 列车录入参数
// ==========================================
// 用途: 接纳/编辑的输入，也是撤销快照的内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSpec {
    pub name: String,             // 车次名称
    pub wagons: u32,              // 车厢数
    pub locomotives: u32,         // 机车数
    pub arrival: NaiveDateTime,   // 到达时刻
    pub departure: NaiveDateTime, // 出发时刻（必须晚于到达）
    pub depot: String,            // 申请存放的车辆段
    #[serde(default)]
    pub category: TrainCategory,  // 存放 / 试验
    #[serde(default)]
    pub electric: bool,           // 是否电力牵引
    #[serde(default)]
    pub locomotive_side: LocomotiveSide, // 无机车一侧
}

impl TrainSpec {
    /// 列车总长（米） = 车厢数×14 + 机车数×19；溢出 u32 时返回 None
    pub fn checked_length_m(&self) -> Option<u32> {
        self.wagons
            .checked_mul(WAGON_LENGTH_M)?
            .checked_add(self.locomotives.checked_mul(LOCOMOTIVE_LENGTH_M)?)
    }

    /// 列车总长（米），溢出时饱和为 u32::MAX（任何股道都放不下）
    pub fn length_m(&self) -> u32 {
        self.checked_length_m().unwrap_or(u32::MAX)
    }

    /// 与另一时间窗 [arrival, departure) 是否重叠
    pub fn overlaps(&self, arrival: NaiveDateTime, departure: NaiveDateTime) -> bool {
        !(self.departure <= arrival || self.arrival >= departure)
    }
}

// ==========================================
// WaitingWindow - 等待窗口
// ==========================================
// end = None 表示无限期等待（没有任何可用股道）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingWindow {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl WaitingWindow {
    /// 等待时长（分钟）；无限期等待返回 None
    pub fn minutes(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_minutes())
    }
}

// ==========================================
// Train - 列车实体
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Train {
    pub id: TrainId,
    #[serde(flatten)]
    spec: TrainSpec,
    length_m: u32,

    // ===== 重算结果 =====
    pub track: Option<u32>,             // 分配的股道编号
    pub waiting: bool,                  // 是否等待
    pub waiting_window: WaitingWindow,  // 等待窗口
}

impl Train {
    pub fn new(id: TrainId, spec: TrainSpec) -> Self {
        let length_m = spec.length_m();
        let arrival = spec.arrival;
        Self {
            id,
            spec,
            length_m,
            track: None,
            waiting: false,
            waiting_window: WaitingWindow {
                start: arrival,
                end: Some(arrival),
            },
        }
    }

    pub fn spec(&self) -> &TrainSpec {
        &self.spec
    }

    /// 整体替换录入参数并重新推导长度
    pub fn apply_spec(&mut self, spec: TrainSpec) {
        self.length_m = spec.length_m();
        self.spec = spec;
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn wagons(&self) -> u32 {
        self.spec.wagons
    }

    pub fn locomotives(&self) -> u32 {
        self.spec.locomotives
    }

    pub fn length_m(&self) -> u32 {
        self.length_m
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.spec.arrival
    }

    pub fn departure(&self) -> NaiveDateTime {
        self.spec.departure
    }

    pub fn depot(&self) -> &str {
        &self.spec.depot
    }

    pub fn category(&self) -> TrainCategory {
        self.spec.category
    }

    pub fn electric(&self) -> bool {
        self.spec.electric
    }

    // ==========================================
    // 重算状态维护
    // ==========================================

    /// 清空分配结果，等待窗口回到 [arrival, arrival)
    pub fn reset_placement(&mut self) {
        self.track = None;
        self.waiting = false;
        self.waiting_window = WaitingWindow {
            start: self.spec.arrival,
            end: Some(self.spec.arrival),
        };
    }

    /// 记录成功分配；start 晚于到达即视为等待
    pub fn mark_placed(&mut self, track_number: u32, start: NaiveDateTime) {
        self.track = Some(track_number);
        self.waiting = start > self.spec.arrival;
        self.waiting_window = WaitingWindow {
            start: self.spec.arrival,
            end: Some(start),
        };
    }

    /// 记录无限期等待
    pub fn mark_unplaced(&mut self) {
        self.track = None;
        self.waiting = true;
        self.waiting_window = WaitingWindow {
            start: self.spec.arrival,
            end: None,
        };
    }

    /// 是否无限期等待
    pub fn is_waiting_indefinitely(&self) -> bool {
        self.waiting && self.waiting_window.end.is_none()
    }
}

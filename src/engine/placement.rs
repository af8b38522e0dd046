// ==========================================
// 车辆段股道排程系统 - 股道查找引擎
// ==========================================
// 职责: 给定列车、参考时刻与台账快照，返回最优 (股道, 开始时刻)
// 规则:
//   1) 容量 < 车长的股道直接跳过
//   2) 单股道按开始时刻升序单遍前推，得到最早可入时刻
//   3) 最早可入时刻必须严格早于列车出发
//   4) 先比最早开始，再比容量（取最紧的股道）
// 红线: 纯查询，不修改台账
// ==========================================

use crate::domain::depot::{OccupationLedger, Track};
use crate::domain::train::Train;
use chrono::{Duration, NaiveDateTime};
use tracing::debug;

/// 查找结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSlot {
    pub track_index: usize,
    pub start: NaiveDateTime,
    pub capacity_m: u32,
}

impl TrackSlot {
    /// 优先级比较：更早开始优先，平局取更短股道
    pub fn is_better_than(&self, other: &TrackSlot) -> bool {
        self.start < other.start
            || (self.start == other.start && self.capacity_m < other.capacity_m)
    }
}

// ==========================================
// PlacementSearch - 股道查找引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct PlacementSearch {
    safety_margin: Duration,
}

impl PlacementSearch {
    pub fn new(safety_margin: Duration) -> Self {
        Self { safety_margin }
    }

    pub fn safety_margin(&self) -> Duration {
        self.safety_margin
    }

    /// 安全间隔扩展后是否冲突
    ///
    /// 冲突条件: candidate_start − margin < occ_end 且 departure + margin > occ_start
    /// 时刻加减越界时按冲突处理
    pub fn conflicts(
        &self,
        candidate_start: NaiveDateTime,
        departure: NaiveDateTime,
        occ_start: NaiveDateTime,
        occ_end: NaiveDateTime,
    ) -> bool {
        let before_end = candidate_start
            .checked_sub_signed(self.safety_margin)
            .map_or(true, |padded| padded < occ_end);
        let after_start = departure
            .checked_add_signed(self.safety_margin)
            .map_or(true, |padded| padded > occ_start);
        before_end && after_start
    }

    /// 单股道最早可入时刻；推算越过时刻上限时返回 None
    fn earliest_start_on_track(
        &self,
        train: &Train,
        reference: NaiveDateTime,
        intervals: &[(NaiveDateTime, NaiveDateTime)],
    ) -> Option<NaiveDateTime> {
        let mut candidate_start = reference;
        for &(occ_start, occ_end) in intervals {
            if self.conflicts(candidate_start, train.departure(), occ_start, occ_end) {
                candidate_start = occ_end.checked_add_signed(self.safety_margin)?;
            }
        }
        Some(candidate_start)
    }

    /// 查找可用股道
    ///
    /// # 参数
    /// - `train`: 待安置列车
    /// - `reference`: 参考时刻（通常为到达时刻）
    /// - `ledger`: 车辆段当前台账
    /// - `tracks`: 车辆段股道容量模型
    ///
    /// # 返回
    /// - Some(TrackSlot): 最优股道与开始时刻
    /// - None: 没有任何股道能在出发前容纳该列车
    pub fn find_track(
        &self,
        train: &Train,
        reference: NaiveDateTime,
        ledger: &OccupationLedger,
        tracks: &[Track],
    ) -> Option<TrackSlot> {
        let mut best: Option<TrackSlot> = None;

        for (track_index, track) in tracks.iter().enumerate() {
            if track.capacity_m() < train.length_m() {
                continue;
            }

            let intervals = ledger.intervals_on_track(track_index);
            let Some(start) = self.earliest_start_on_track(train, reference, &intervals) else {
                continue;
            };
            if start >= train.departure() {
                continue;
            }

            let candidate = TrackSlot {
                track_index,
                start,
                capacity_m: track.capacity_m(),
            };
            match best {
                Some(ref current) if !candidate.is_better_than(current) => {}
                _ => best = Some(candidate),
            }
        }

        debug!(
            train_id = train.id,
            length_m = train.length_m(),
            result = ?best,
            "股道查找完成"
        );
        best
    }
}

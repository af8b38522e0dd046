// ==========================================
// 车辆段股道排程系统 - 重算引擎
// ==========================================
// 职责: 清空台账，按到达时刻重放全部列车
// 输入: 车辆段目录 + 列车列表
// 输出: 重建后的台账 + 每列车的股道/等待状态
// 红线: 重放前必须重新排序（稳定排序，平局保持原顺序）
// 红线: 无法安置的列车记为无限期等待，不中断重算
// ==========================================

use crate::domain::depot::{Depot, DepotRegistry, Occupation};
use crate::domain::train::Train;
use crate::engine::error::EngineError;
use crate::engine::placement::PlacementSearch;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument, warn};

// ==========================================
// RecalcResult - 重算结果
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalcResult {
    pub total_trains: usize,         // 参与重放的列车数
    pub placed: usize,               // 已分配股道
    pub delayed: usize,              // 已分配但需等待
    pub waiting_indefinitely: usize, // 无限期等待
}

// ==========================================
// RecalcEngine - 重算引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct RecalcEngine {
    search: PlacementSearch,
}

impl RecalcEngine {
    pub fn new(search: PlacementSearch) -> Self {
        Self { search }
    }

    pub fn search(&self) -> &PlacementSearch {
        &self.search
    }

    /// 全量重算（所有车辆段）
    ///
    /// # 返回
    /// - Ok(RecalcResult): 重算统计
    /// - Err(EngineError::UnknownDepot): 有列车引用了不存在的车辆段（此时不修改任何状态）
    #[instrument(skip_all, fields(trains = trains.len(), depots = depots.len()))]
    pub fn recalculate_all(
        &self,
        depots: &mut DepotRegistry,
        trains: &mut [Train],
    ) -> Result<RecalcResult, EngineError> {
        let started = Instant::now();

        // 1. 结构校验（先校验后清空，失败时状态不变）
        if let Some(orphan) = trains.iter().find(|t| !depots.contains(t.depot())) {
            return Err(EngineError::UnknownDepot {
                train_id: orphan.id,
                depot: orphan.depot().to_string(),
            });
        }

        // 2. 清空台账与分配结果
        for depot in depots.iter_mut() {
            depot.ledger_mut().clear();
        }
        for train in trains.iter_mut() {
            train.reset_placement();
        }

        // 3. 按到达时刻稳定排序
        trains.sort_by_key(|t| t.arrival());

        // 4. 逐列重放
        let mut result = RecalcResult::default();
        for train in trains.iter_mut() {
            let depot = depots
                .get_mut(train.depot())
                .ok_or_else(|| EngineError::UnknownDepot {
                    train_id: train.id,
                    depot: train.depot().to_string(),
                })?;
            self.place_train(depot, train, &mut result);
        }

        info!(
            total = result.total_trains,
            placed = result.placed,
            delayed = result.delayed,
            waiting_indefinitely = result.waiting_indefinitely,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "全量重算完成"
        );
        Ok(result)
    }

    /// 单车辆段重算
    ///
    /// 只清空该车辆段台账，并重放申请该车辆段的列车
    #[instrument(skip(self, depots, trains), fields(trains = trains.len()))]
    pub fn recalculate_depot(
        &self,
        depot_name: &str,
        depots: &mut DepotRegistry,
        trains: &mut [Train],
    ) -> Result<RecalcResult, EngineError> {
        let depot = depots
            .get_mut(depot_name)
            .ok_or_else(|| EngineError::DepotNotFound(depot_name.to_string()))?;

        depot.ledger_mut().clear();
        trains.sort_by_key(|t| t.arrival());

        let mut result = RecalcResult::default();
        for train in trains.iter_mut().filter(|t| t.depot() == depot_name) {
            train.reset_placement();
            self.place_train(depot, train, &mut result);
        }

        info!(depot = depot_name, placed = result.placed, "车辆段重算完成");
        Ok(result)
    }

    /// 安置单列车并写入台账
    fn place_train(&self, depot: &mut Depot, train: &mut Train, result: &mut RecalcResult) {
        result.total_trains += 1;

        let slot = self
            .search
            .find_track(train, train.arrival(), depot.ledger(), depot.tracks());

        match slot {
            Some(slot) => {
                let track_number = depot.tracks()[slot.track_index].number();
                depot.ledger_mut().push(Occupation {
                    track_index: slot.track_index,
                    start: slot.start,
                    end: train.departure(),
                    train_id: train.id,
                });
                train.mark_placed(track_number, slot.start);

                result.placed += 1;
                if train.waiting {
                    result.delayed += 1;
                }
            }
            None => {
                train.mark_unplaced();
                result.waiting_indefinitely += 1;
                warn!(
                    train_id = train.id,
                    name = train.name(),
                    depot = depot.name(),
                    length_m = train.length_m(),
                    "列车无可用股道，无限期等待"
                );
            }
        }
    }
}

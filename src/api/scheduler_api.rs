// ==========================================
// 车辆段股道排程系统 - 排程 API
// ==========================================
// 职责: 列车接纳/编辑/删除/撤销、车辆段管理、只读查询
// 红线: 所有变更在同一把互斥锁内完成（校验 + 变更 + 全量重算）
// 红线: 全局试算只在锁内取快照，计算在锁外进行
// ==========================================

use chrono::{Duration, NaiveDateTime};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use crate::api::dto::{
    DepotSnapshot, DepotSummary, LocalPlacement, TrainOccupation, TrainTimeline,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::TrainValidator;
use crate::config::scheduler_config::{DepotConfig, SchedulerConfig};
use crate::domain::depot::DepotRegistry;
use crate::domain::history::{History, HistoryEntry, TrainSnapshot};
use crate::domain::train::{Train, TrainSpec};
use crate::domain::types::TrainId;
use crate::engine::{
    DailyRequirement, GlobalOptimizer, GlobalPlacement, OccupancyRecord, OptionalEventPublisher,
    PlacementSearch, RecalcEngine, RecalcResult, ScheduleEvent, ScheduleEventPublisher,
    ScheduleEventType, SchedulerStatistics, StatisticsEngine, UndoEngine, UndoOutcome,
};

// ==========================================
// SchedulerState - 共享排程状态
// ==========================================
#[derive(Debug)]
struct SchedulerState {
    depots: DepotRegistry,
    trains: Vec<Train>,
    history: History,
    next_id: TrainId, // 单调递增，reset 后不回退
}

impl SchedulerState {
    fn find(&self, id: TrainId) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    fn position(&self, id: TrainId) -> ApiResult<usize> {
        self.trains
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ApiError::train_not_found(id))
    }
}

// ==========================================
// SchedulerApi - 排程 API
// ==========================================

/// 排程API
///
/// 职责：
/// 1. 列车变更（接纳、编辑、删除、撤销），每次变更后全量重算
/// 2. 车辆段管理（新增、重置、手动重算）
/// 3. 只读查询（快照、本地安置、全局试算、统计）
pub struct SchedulerApi {
    state: Mutex<SchedulerState>,
    recalc_engine: RecalcEngine,
    global_optimizer: GlobalOptimizer,
    stats_engine: StatisticsEngine,
    validator: TrainValidator,
    event_publisher: OptionalEventPublisher,
}

impl SchedulerApi {
    /// 创建新的SchedulerApi实例
    ///
    /// # 参数
    /// - depots: 车辆段目录（顺序决定跨段平局）
    /// - safety_margin: 同股道相邻列车之间的安全间隔
    pub fn new(depots: DepotRegistry, safety_margin: Duration) -> Self {
        let search = PlacementSearch::new(safety_margin);
        Self {
            state: Mutex::new(SchedulerState {
                depots,
                trains: Vec::new(),
                history: History::new(),
                next_id: 1,
            }),
            recalc_engine: RecalcEngine::new(search),
            global_optimizer: GlobalOptimizer::new(search),
            stats_engine: StatisticsEngine::new(),
            validator: TrainValidator::new(),
            event_publisher: OptionalEventPublisher::none(),
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> ApiResult<Self> {
        let depots = config.build_registry()?;
        Ok(Self::new(depots, config.safety_margin()))
    }

    /// 挂接事件发布者
    pub fn with_event_publisher(mut self, publisher: Arc<dyn ScheduleEventPublisher>) -> Self {
        self.event_publisher = OptionalEventPublisher::with_publisher(publisher);
        self
    }

    pub fn safety_margin(&self) -> Duration {
        self.recalc_engine.search().safety_margin()
    }

    fn lock(&self) -> ApiResult<MutexGuard<'_, SchedulerState>> {
        self.state
            .lock()
            .map_err(|e| ApiError::LockPoisoned(e.to_string()))
    }

    fn recalculate_locked(&self, state: &mut SchedulerState) -> ApiResult<RecalcResult> {
        let SchedulerState { depots, trains, .. } = state;
        Ok(self.recalc_engine.recalculate_all(depots, trains)?)
    }

    fn publish(&self, event_type: ScheduleEventType, train_id: Option<TrainId>, depot: Option<String>) {
        self.event_publisher
            .publish(ScheduleEvent::new(event_type, train_id, depot));
    }

    // ==========================================
    // 列车变更
    // ==========================================

    /// 接纳列车
    ///
    /// # 返回
    /// - Ok(TrainId): 新列车ID
    /// - Err(ApiError::InvalidInput / UnknownDepot / DuplicateBooking): 校验失败，状态不变
    pub fn admit(&self, spec: TrainSpec) -> ApiResult<TrainId> {
        let mut state = self.lock()?;
        self.validator
            .validate(&spec, &state.depots, &state.trains, None)?;

        let id = state.next_id;
        let depot = spec.depot.clone();
        state.trains.push(Train::new(id, spec));

        if let Err(e) = self.recalculate_locked(&mut state) {
            state.trains.retain(|t| t.id != id);
            return Err(e);
        }
        state.next_id += 1;
        state.history.record(HistoryEntry::Admitted(id));

        if let Some(train) = state.find(id) {
            info!(
                train_id = id,
                depot = %depot,
                track = ?train.track,
                waiting = train.waiting,
                "列车已接纳"
            );
        }
        drop(state);

        self.publish(ScheduleEventType::TrainAdmitted, Some(id), Some(depot));
        Ok(id)
    }

    /// 编辑列车（整体替换录入参数）
    ///
    /// # 返回
    /// - Ok(Train): 重算后的列车
    /// - Err(ApiError::NotFound): 列车不存在
    pub fn edit(&self, id: TrainId, spec: TrainSpec) -> ApiResult<Train> {
        let mut state = self.lock()?;
        let pos = state.position(id)?;
        self.validator
            .validate(&spec, &state.depots, &state.trains, Some(id))?;

        let snapshot = TrainSnapshot::from(&state.trains[pos]);
        let depot = spec.depot.clone();
        state.trains[pos].apply_spec(spec);

        if let Err(e) = self.recalculate_locked(&mut state) {
            if let Some(train) = state.trains.iter_mut().find(|t| t.id == id) {
                train.apply_spec(snapshot.spec);
            }
            return Err(e);
        }
        state.history.record(HistoryEntry::Modified(snapshot));

        let updated = state
            .find(id)
            .cloned()
            .ok_or_else(|| ApiError::train_not_found(id))?;
        info!(train_id = id, depot = %depot, track = ?updated.track, "列车已修改");
        drop(state);

        self.publish(ScheduleEventType::TrainUpdated, Some(id), Some(depot));
        Ok(updated)
    }

    /// 删除列车
    pub fn remove(&self, id: TrainId) -> ApiResult<()> {
        let mut state = self.lock()?;
        let pos = state.position(id)?;
        let removed = state.trains.remove(pos);

        if let Err(e) = self.recalculate_locked(&mut state) {
            state.trains.insert(pos, removed);
            return Err(e);
        }
        let depot = removed.depot().to_string();
        state
            .history
            .record(HistoryEntry::Removed(TrainSnapshot::from(&removed)));
        info!(train_id = id, depot = %depot, "列车已删除");
        drop(state);

        self.publish(ScheduleEventType::TrainRemoved, Some(id), Some(depot));
        Ok(())
    }

    /// 撤销最近一次变更
    ///
    /// # 返回
    /// - Err(ApiError::NothingToUndo): 历史为空，状态不变
    /// - Err(ApiError::NotFound): 撤销修改时列车已不存在（该历史被丢弃）
    pub fn undo(&self) -> ApiResult<UndoOutcome> {
        let mut state = self.lock()?;
        let entry = state.history.pop().ok_or(ApiError::NothingToUndo)?;
        let action = entry.as_str();

        let outcome = UndoEngine::revert(entry, &mut state.trains)?;
        self.recalculate_locked(&mut state)?;
        info!(action, outcome = ?outcome, remaining = state.history.len(), "撤销完成");
        drop(state);

        let train_id = match outcome {
            UndoOutcome::Removed(id) | UndoOutcome::Reinstated(id) | UndoOutcome::Restored(id) => id,
        };
        self.publish(ScheduleEventType::UndoApplied, Some(train_id), None);
        Ok(outcome)
    }

    // ==========================================
    // 车辆段管理
    // ==========================================

    /// 新增车辆段（空台账），随后全量重算
    pub fn add_depot(&self, config: DepotConfig) -> ApiResult<()> {
        config.validate()?;

        let mut state = self.lock()?;
        if state.depots.contains(&config.name) {
            return Err(ApiError::DepotAlreadyExists(config.name));
        }
        state
            .depots
            .insert(config.to_depot())
            .map_err(|d| ApiError::DepotAlreadyExists(d.name().to_string()))?;
        self.recalculate_locked(&mut state)?;
        info!(depot = %config.name, tracks = config.track_numbers.len(), "车辆段已新增");
        drop(state);

        self.publish(ScheduleEventType::DepotAdded, None, Some(config.name));
        Ok(())
    }

    /// 重置：清空台账、列车与历史（保留车辆段与ID计数器）
    pub fn reset(&self) -> ApiResult<()> {
        let mut state = self.lock()?;
        let cleared = state.trains.len();
        state.trains.clear();
        state.history.clear();
        self.recalculate_locked(&mut state)?;
        info!(cleared, "排程已重置");
        drop(state);

        self.publish(ScheduleEventType::Reset, None, None);
        Ok(())
    }

    /// 手动全量重算
    pub fn recalculate(&self) -> ApiResult<RecalcResult> {
        let mut state = self.lock()?;
        let result = self.recalculate_locked(&mut state)?;
        info!(placed = result.placed, "手动重算完成");
        drop(state);

        self.publish(ScheduleEventType::ManualRecalc, None, None);
        Ok(result)
    }

    /// 单车辆段重算
    pub fn recalculate_depot(&self, depot: &str) -> ApiResult<RecalcResult> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let result = self
            .recalc_engine
            .recalculate_depot(depot, &mut state.depots, &mut state.trains)?;
        drop(guard);

        self.publish(ScheduleEventType::ManualRecalc, None, Some(depot.to_string()));
        Ok(result)
    }

    // ==========================================
    // 只读查询
    // ==========================================

    pub fn get_depot_snapshot(&self, depot: &str) -> ApiResult<DepotSnapshot> {
        let state = self.lock()?;
        let d = state
            .depots
            .get(depot)
            .ok_or_else(|| ApiError::UnknownDepot(depot.to_string()))?;
        Ok(DepotSnapshot::capture(d, &state.trains))
    }

    /// 本地安置结果（按重放顺序）
    pub fn get_local_placement(&self) -> ApiResult<Vec<LocalPlacement>> {
        let state = self.lock()?;
        Ok(state.trains.iter().map(LocalPlacement::from).collect())
    }

    /// 全局试算（不修改实际台账）
    pub fn get_global_placement(&self) -> ApiResult<Vec<GlobalPlacement>> {
        let (trains, depots) = {
            let state = self.lock()?;
            (state.trains.clone(), state.depots.cloned_empty())
        };
        debug!(trains = trains.len(), "全局试算快照已获取");
        Ok(self.global_optimizer.optimize(&trains, &depots))
    }

    pub fn list_trains(&self) -> ApiResult<Vec<Train>> {
        Ok(self.lock()?.trains.clone())
    }

    pub fn get_train(&self, id: TrainId) -> ApiResult<Train> {
        self.lock()?
            .find(id)
            .cloned()
            .ok_or_else(|| ApiError::train_not_found(id))
    }

    pub fn list_depots(&self) -> ApiResult<Vec<DepotSummary>> {
        let state = self.lock()?;
        Ok(state.depots.iter().map(DepotSummary::from).collect())
    }

    pub fn history_len(&self) -> ApiResult<usize> {
        Ok(self.lock()?.history.len())
    }

    pub fn statistics(&self) -> ApiResult<SchedulerStatistics> {
        let state = self.lock()?;
        Ok(self.stats_engine.statistics(&state.depots, &state.trains))
    }

    pub fn daily_requirements(&self) -> ApiResult<Vec<DailyRequirement>> {
        let state = self.lock()?;
        Ok(self.stats_engine.daily_requirements(&state.trains))
    }

    /// 某时刻的股道占用（depot = None 时查询全部车辆段）
    pub fn occupancy_at(
        &self,
        instant: NaiveDateTime,
        depot: Option<&str>,
    ) -> ApiResult<Vec<OccupancyRecord>> {
        let state = self.lock()?;
        if let Some(name) = depot {
            if !state.depots.contains(name) {
                return Err(ApiError::UnknownDepot(name.to_string()));
            }
        }
        Ok(self
            .stats_engine
            .occupancy_at(&state.depots, &state.trains, instant, depot))
    }

    /// 单列车的占用区间与等待窗口
    pub fn train_occupations(&self, id: TrainId) -> ApiResult<TrainTimeline> {
        let state = self.lock()?;
        let train = state.find(id).ok_or_else(|| ApiError::train_not_found(id))?;

        let mut occupations = Vec::new();
        for depot in state.depots.iter() {
            for occ in depot.ledger().entries().iter().filter(|o| o.train_id == id) {
                if let Some(track) = depot.track(occ.track_index) {
                    occupations.push(TrainOccupation {
                        depot: depot.name().to_string(),
                        track: track.number(),
                        start: occ.start,
                        end: occ.end,
                    });
                }
            }
        }

        Ok(TrainTimeline {
            train_id: id,
            occupations,
            waiting_window: train.waiting.then_some(train.waiting_window),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::depot::{Depot, Track};
    use crate::domain::types::{LocomotiveSide, TrainCategory};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn spec(name: &str, wagons: u32, arrival: NaiveDateTime, departure: NaiveDateTime) -> TrainSpec {
        TrainSpec {
            name: name.to_string(),
            wagons,
            locomotives: 1,
            arrival,
            departure,
            depot: "D".to_string(),
            category: TrainCategory::Storage,
            electric: false,
            locomotive_side: LocomotiveSide::Left,
        }
    }

    fn api() -> SchedulerApi {
        let mut depots = DepotRegistry::new();
        depots
            .insert(Depot::new("D", vec![Track::new(1, 200), Track::new(2, 300)], None))
            .unwrap();
        SchedulerApi::new(depots, Duration::minutes(10))
    }

    #[test]
    fn test_rejected_admission_leaves_state_untouched() {
        let api = api();
        let result = api.admit(spec("A", 5, at(10, 0), at(8, 0)));
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        assert!(api.list_trains().unwrap().is_empty());
        assert_eq!(api.history_len().unwrap(), 0);
    }

    #[test]
    fn test_oversized_consist_keeps_api_usable() {
        let api = api();
        let result = api.admit(spec("Huge", u32::MAX / 10, at(8, 0), at(9, 0)));
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));

        let id = api.admit(spec("A", 5, at(8, 0), at(9, 0))).unwrap();
        let mut oversized = spec("A", u32::MAX / 10, at(8, 0), at(9, 0));
        assert!(matches!(api.edit(id, oversized.clone()), Err(ApiError::InvalidInput(_))));
        oversized.wagons = 6;
        api.edit(id, oversized).unwrap();
        assert_eq!(api.list_trains().unwrap().len(), 1);
    }

    #[test]
    fn test_ids_monotonic_across_reset() {
        let api = api();
        let first = api.admit(spec("A", 5, at(8, 0), at(9, 0))).unwrap();
        api.reset().unwrap();
        let second = api.admit(spec("A", 5, at(8, 0), at(9, 0))).unwrap();
        assert!(second > first);
        assert_eq!(api.history_len().unwrap(), 1);
    }

    #[test]
    fn test_train_timeline() {
        let api = api();
        let a = api.admit(spec("A", 5, at(8, 0), at(10, 0))).unwrap();
        let b = api.admit(spec("B", 5, at(8, 0), at(11, 0))).unwrap();
        let c = api.admit(spec("C", 5, at(8, 30), at(12, 0))).unwrap();

        let timeline = api.train_occupations(a).unwrap();
        assert_eq!(timeline.occupations.len(), 1);
        assert!(timeline.waiting_window.is_none());

        // 两条股道均被占用，C 最早在 A 出发 + 安全间隔后入线
        let timeline = api.train_occupations(c).unwrap();
        assert_eq!(timeline.occupations[0].start, at(10, 10));
        assert!(timeline.waiting_window.is_some());

        assert!(api.train_occupations(b + 100).is_err());
    }
}

// ==========================================
// 车辆段股道排程系统 - 全局优化器（试算）
// ==========================================
// 职责: 忽略列车申请的车辆段，跨所有车辆段寻找最优股道
// 输入: 列车列表 + 车辆段目录（只读）
// 输出: 每列车的建议 车辆段/股道/开始时刻
// 红线: 只在私有副本上模拟，绝不修改正式台账
// ==========================================

use crate::domain::depot::{DepotRegistry, Occupation};
use crate::domain::train::Train;
use crate::domain::types::TrainId;
use crate::engine::placement::{PlacementSearch, TrackSlot};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

// ==========================================
// GlobalPlacement - 全局建议
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPlacement {
    pub train_id: TrainId,
    pub name: String,
    pub arrival: NaiveDateTime,
    pub departure: NaiveDateTime,
    pub length_m: u32,
    pub depot: Option<String>,        // None: 所有车辆段均无法容纳
    pub track: Option<u32>,           // 股道编号
    pub start: Option<NaiveDateTime>, // 建议开始时刻
    pub end: Option<NaiveDateTime>,
    pub waiting: bool,
}

// ==========================================
// GlobalOptimizer - 全局优化器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct GlobalOptimizer {
    search: PlacementSearch,
}

impl GlobalOptimizer {
    pub fn new(search: PlacementSearch) -> Self {
        Self { search }
    }

    /// 全局试算
    ///
    /// 各车辆段从空台账开始；每列车在所有车辆段中取
    /// "最早开始、其次最短股道" 的候选，跨段平局保留目录中靠前的车辆段
    #[instrument(skip_all, fields(trains = trains.len(), depots = depots.len()))]
    pub fn optimize(&self, trains: &[Train], depots: &DepotRegistry) -> Vec<GlobalPlacement> {
        let mut simulation = depots.cloned_empty();

        let mut ordered: Vec<&Train> = trains.iter().collect();
        ordered.sort_by_key(|t| t.arrival());

        let mut placements = Vec::with_capacity(ordered.len());
        for train in ordered {
            let mut best: Option<(String, TrackSlot)> = None;

            for depot in simulation.iter() {
                let Some(slot) =
                    self.search
                        .find_track(train, train.arrival(), depot.ledger(), depot.tracks())
                else {
                    continue;
                };
                let better = match &best {
                    None => true,
                    Some((_, current)) => slot.is_better_than(current),
                };
                if better {
                    best = Some((depot.name().to_string(), slot));
                }
            }

            // 写入私有副本，后续列车可见
            let committed = best.and_then(|(depot_name, slot)| {
                let depot = simulation.get_mut(&depot_name)?;
                let track_number = depot.tracks()[slot.track_index].number();
                depot.ledger_mut().push(Occupation {
                    track_index: slot.track_index,
                    start: slot.start,
                    end: train.departure(),
                    train_id: train.id,
                });
                Some((depot_name, track_number, slot.start))
            });

            let placement = match committed {
                Some((depot_name, track_number, start)) => {
                    debug!(
                        train_id = train.id,
                        depot = %depot_name,
                        track = track_number,
                        "全局试算选定股道"
                    );
                    GlobalPlacement {
                        train_id: train.id,
                        name: train.name().to_string(),
                        arrival: train.arrival(),
                        departure: train.departure(),
                        length_m: train.length_m(),
                        depot: Some(depot_name),
                        track: Some(track_number),
                        start: Some(start),
                        end: Some(train.departure()),
                        waiting: start > train.arrival(),
                    }
                }
                None => GlobalPlacement {
                    train_id: train.id,
                    name: train.name().to_string(),
                    arrival: train.arrival(),
                    departure: train.departure(),
                    length_m: train.length_m(),
                    depot: None,
                    track: None,
                    start: None,
                    end: None,
                    waiting: true,
                },
            };
            placements.push(placement);
        }

        info!(
            placed = placements.iter().filter(|p| p.depot.is_some()).count(),
            "全局试算完成"
        );
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::depot::{Depot, Track};
    use crate::domain::train::TrainSpec;
    use crate::domain::types::{LocomotiveSide, TrainCategory};
    use chrono::{Duration, NaiveDate};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn train(id: u64, depot: &str, wagons: u32, arrival: NaiveDateTime, departure: NaiveDateTime) -> Train {
        Train::new(
            id,
            TrainSpec {
                name: format!("T{}", id),
                wagons,
                locomotives: 0,
                arrival,
                departure,
                depot: depot.to_string(),
                category: TrainCategory::Storage,
                electric: false,
                locomotive_side: LocomotiveSide::Left,
            },
        )
    }

    fn optimizer() -> GlobalOptimizer {
        GlobalOptimizer::new(PlacementSearch::new(Duration::minutes(10)))
    }

    fn two_depots() -> DepotRegistry {
        let mut registry = DepotRegistry::new();
        registry
            .insert(Depot::new("Big", vec![Track::new(1, 400)], None))
            .unwrap();
        registry
            .insert(Depot::new("Small", vec![Track::new(2, 150)], None))
            .unwrap();
        registry
    }

    #[test]
    fn test_picks_tightest_track_across_depots() {
        // 申请 Big，但 Small 的股道更紧
        let trains = vec![train(1, "Big", 10, at(8, 0), at(10, 0))];
        let result = optimizer().optimize(&trains, &two_depots());

        assert_eq!(result[0].depot.as_deref(), Some("Small"));
        assert_eq!(result[0].track, Some(2));
        assert!(!result[0].waiting);
    }

    #[test]
    fn test_later_trains_see_earlier_placements() {
        let trains = vec![
            train(1, "Big", 10, at(8, 0), at(10, 0)),
            train(2, "Big", 10, at(8, 30), at(12, 0)),
        ];
        let result = optimizer().optimize(&trains, &two_depots());

        assert_eq!(result[1].depot.as_deref(), Some("Big"));
        assert_eq!(result[1].start, Some(at(8, 30)));
    }

    #[test]
    fn test_unplaceable_everywhere() {
        let trains = vec![train(1, "Big", 40, at(8, 0), at(10, 0))];
        let result = optimizer().optimize(&trains, &two_depots());

        assert!(result[0].depot.is_none());
        assert!(result[0].track.is_none());
        assert!(result[0].waiting);
    }

    #[test]
    fn test_live_ledgers_untouched() {
        let depots = two_depots();
        let before = depots.clone();
        let trains = vec![train(1, "Big", 10, at(8, 0), at(10, 0))];
        let _ = optimizer().optimize(&trains, &depots);
        assert_eq!(depots, before);
    }

    #[test]
    fn test_cross_depot_tie_keeps_directory_order() {
        let mut registry = DepotRegistry::new();
        registry.insert(Depot::new("First", vec![Track::new(1, 200)], None)).unwrap();
        registry.insert(Depot::new("Second", vec![Track::new(2, 200)], None)).unwrap();

        let trains = vec![train(1, "Second", 10, at(8, 0), at(10, 0))];
        let result = optimizer().optimize(&trains, &registry);
        assert_eq!(result[0].depot.as_deref(), Some("First"));
    }
}

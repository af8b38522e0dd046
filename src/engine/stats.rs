// ==========================================
// 车辆段股道排程系统 - 统计引擎
// ==========================================
// 职责: 等待时长、股道占用率、每日资源需求、时刻占用查询
// 说明: 占用率以每股道一天 24h 为分母
// ==========================================

use crate::domain::depot::DepotRegistry;
use crate::domain::train::Train;
use crate::domain::types::{TrainCategory, TrainId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

// ==========================================
// 输出结构
// ==========================================

/// 单车辆段统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepotStatistics {
    pub depot: String,
    pub train_count: usize,       // 申请该车辆段的列车数
    pub occupancy_pct: f64,       // 占用率（%，一位小数）
}

/// 全局统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerStatistics {
    pub total_trains: usize,
    pub electric_trains: usize,
    pub mean_waiting_minutes: f64,  // 不含无限期等待
    pub global_occupancy_pct: f64,
    pub per_depot: Vec<DepotStatistics>,
}

/// 每日资源需求（按到达日期）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRequirement {
    pub date: NaiveDate,
    pub test_drivers: usize,
    pub locomotives: u32,
    pub depots_test_drivers: Vec<String>,
    pub depots_locomotives: Vec<String>,
}

/// 某时刻股道上的列车
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    pub depot: String,
    pub track: u32,
    pub train_id: TrainId,
    pub train_name: String,
    pub category: TrainCategory,
    pub electric: bool,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub wagons: u32,
    pub locomotives: u32,
}

// ==========================================
// StatisticsEngine - 统计引擎
// ==========================================
pub struct StatisticsEngine {
    // 无状态引擎
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 平均等待分钟数（无限期等待不计入）
    pub fn mean_waiting_minutes(&self, trains: &[Train]) -> f64 {
        let waits: Vec<i64> = trains
            .iter()
            .filter_map(|t| t.waiting_window.minutes())
            .collect();
        if waits.is_empty() {
            return 0.0;
        }
        waits.iter().sum::<i64>() as f64 / waits.len() as f64
    }

    pub fn statistics(&self, depots: &DepotRegistry, trains: &[Train]) -> SchedulerStatistics {
        let mut total_occupied = 0i64;
        let mut total_possible = 0.0;
        let mut per_depot = Vec::with_capacity(depots.len());

        for depot in depots.iter() {
            let occupied = depot.ledger().occupied_minutes();
            let possible = depot.tracks().len() as f64 * MINUTES_PER_DAY;
            total_occupied += occupied;
            total_possible += possible;

            per_depot.push(DepotStatistics {
                depot: depot.name().to_string(),
                train_count: trains.iter().filter(|t| t.depot() == depot.name()).count(),
                occupancy_pct: percentage(occupied as f64, possible),
            });
        }

        SchedulerStatistics {
            total_trains: trains.len(),
            electric_trains: trains.iter().filter(|t| t.electric()).count(),
            mean_waiting_minutes: self.mean_waiting_minutes(trains),
            global_occupancy_pct: percentage(total_occupied as f64, total_possible),
            per_depot,
        }
    }

    /// 每日资源需求：试验司机数、机车数及涉及的车辆段
    pub fn daily_requirements(&self, trains: &[Train]) -> Vec<DailyRequirement> {
        let mut by_day: BTreeMap<NaiveDate, Vec<&Train>> = BTreeMap::new();
        for train in trains {
            by_day.entry(train.arrival().date()).or_default().push(train);
        }

        by_day
            .into_iter()
            .map(|(date, day_trains)| {
                let testing: Vec<&&Train> = day_trains
                    .iter()
                    .filter(|t| t.category() == TrainCategory::Testing)
                    .collect();
                let depots_test_drivers: BTreeSet<String> =
                    testing.iter().map(|t| t.depot().to_string()).collect();
                let depots_locomotives: BTreeSet<String> = day_trains
                    .iter()
                    .filter(|t| t.locomotives() > 0)
                    .map(|t| t.depot().to_string())
                    .collect();

                DailyRequirement {
                    date,
                    test_drivers: testing.len(),
                    locomotives: day_trains.iter().map(|t| t.locomotives()).sum(),
                    depots_test_drivers: depots_test_drivers.into_iter().collect(),
                    depots_locomotives: depots_locomotives.into_iter().collect(),
                }
            })
            .collect()
    }

    /// 某时刻各股道上的列车（depot = None 时查询全部车辆段）
    pub fn occupancy_at(
        &self,
        depots: &DepotRegistry,
        trains: &[Train],
        instant: NaiveDateTime,
        depot: Option<&str>,
    ) -> Vec<OccupancyRecord> {
        let mut records = Vec::new();
        for d in depots.iter().filter(|d| depot.map_or(true, |name| d.name() == name)) {
            for occ in d.ledger().entries().iter().filter(|o| o.covers(instant)) {
                let Some(train) = trains.iter().find(|t| t.id == occ.train_id) else {
                    continue;
                };
                let Some(track) = d.track(occ.track_index) else {
                    continue;
                };
                records.push(OccupancyRecord {
                    depot: d.name().to_string(),
                    track: track.number(),
                    train_id: train.id,
                    train_name: train.name().to_string(),
                    category: train.category(),
                    electric: train.electric(),
                    start: occ.start,
                    end: occ.end,
                    wagons: train.wagons(),
                    locomotives: train.locomotives(),
                });
            }
        }
        records
    }
}

/// 百分比，保留一位小数；分母为 0 时返回 0
fn percentage(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    (1000.0 * part / whole).round() / 10.0
}

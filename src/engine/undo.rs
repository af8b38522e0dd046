// ==========================================
// 车辆段股道排程系统 - 撤销引擎
// ==========================================
// 职责: 按历史记录逆向恢复列车列表
// 说明: 只负责列表层面的回滚，回滚后由调用方触发全量重算
// ==========================================

use crate::domain::history::HistoryEntry;
use crate::domain::train::Train;
use crate::domain::types::TrainId;
use crate::engine::error::EngineError;
use serde::Serialize;

/// 撤销结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "train_id", rename_all = "snake_case")]
pub enum UndoOutcome {
    Removed(TrainId),    // 撤销接纳
    Reinstated(TrainId), // 撤销删除
    Restored(TrainId),   // 撤销修改
}

pub struct UndoEngine;

impl UndoEngine {
    /// 回滚单条历史
    ///
    /// # 返回
    /// - Err(EngineError::TrainNotFound): 撤销修改时列车已不存在
    pub fn revert(entry: HistoryEntry, trains: &mut Vec<Train>) -> Result<UndoOutcome, EngineError> {
        match entry {
            HistoryEntry::Admitted(id) => {
                trains.retain(|t| t.id != id);
                Ok(UndoOutcome::Removed(id))
            }
            HistoryEntry::Removed(snapshot) => {
                let id = snapshot.id;
                let arrival = snapshot.spec.arrival;
                // 按 (到达, ID) 放回原位置，保证重算时平局顺序与删除前一致
                let pos = trains
                    .iter()
                    .position(|t| (t.arrival(), t.id) > (arrival, id))
                    .unwrap_or(trains.len());
                trains.insert(pos, Train::new(id, snapshot.spec));
                Ok(UndoOutcome::Reinstated(id))
            }
            HistoryEntry::Modified(snapshot) => {
                let id = snapshot.id;
                let train = trains
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or(EngineError::TrainNotFound(id))?;
                train.apply_spec(snapshot.spec);
                Ok(UndoOutcome::Restored(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::TrainSnapshot;
    use crate::domain::train::TrainSpec;
    use crate::domain::types::{LocomotiveSide, TrainCategory};
    use chrono::NaiveDate;

    fn spec(name: &str, wagons: u32) -> TrainSpec {
        let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        TrainSpec {
            name: name.to_string(),
            wagons,
            locomotives: 1,
            arrival: day.and_hms_opt(8, 0, 0).unwrap(),
            departure: day.and_hms_opt(10, 0, 0).unwrap(),
            depot: "Glostrup".to_string(),
            category: TrainCategory::Testing,
            electric: true,
            locomotive_side: LocomotiveSide::Right,
        }
    }

    #[test]
    fn test_revert_admission_removes_train() {
        let mut trains = vec![Train::new(1, spec("A", 5)), Train::new(2, spec("B", 5))];
        let outcome = UndoEngine::revert(HistoryEntry::Admitted(2), &mut trains).unwrap();
        assert_eq!(outcome, UndoOutcome::Removed(2));
        assert_eq!(trains.len(), 1);
    }

    #[test]
    fn test_revert_removal_reinstates_snapshot() {
        let original = Train::new(3, spec("C", 7));
        let snapshot = TrainSnapshot::from(&original);
        let mut trains = Vec::new();

        UndoEngine::revert(HistoryEntry::Removed(snapshot), &mut trains).unwrap();
        assert_eq!(trains[0].id, 3);
        assert_eq!(trains[0].spec(), original.spec());
        assert_eq!(trains[0].length_m(), original.length_m());
    }

    #[test]
    fn test_revert_removal_keeps_tie_order() {
        let mut trains = vec![Train::new(1, spec("A", 5)), Train::new(3, spec("C", 5))];
        let snapshot = TrainSnapshot::from(&Train::new(2, spec("B", 5)));

        UndoEngine::revert(HistoryEntry::Removed(snapshot), &mut trains).unwrap();
        let ids: Vec<_> = trains.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_revert_modification_restores_fields() {
        let mut trains = vec![Train::new(4, spec("D", 20))];
        let snapshot = TrainSnapshot { id: 4, spec: spec("D-old", 3) };

        UndoEngine::revert(HistoryEntry::Modified(snapshot), &mut trains).unwrap();
        assert_eq!(trains[0].name(), "D-old");
        assert_eq!(trains[0].length_m(), 3 * 14 + 19);
    }

    #[test]
    fn test_revert_modification_of_missing_train() {
        let mut trains = Vec::new();
        let snapshot = TrainSnapshot { id: 9, spec: spec("X", 1) };
        let err = UndoEngine::revert(HistoryEntry::Modified(snapshot), &mut trains).unwrap_err();
        assert_eq!(err, EngineError::TrainNotFound(9));
    }
}

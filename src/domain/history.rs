// ==========================================
// 车辆段股道排程系统 - 操作历史领域模型
// ==========================================
// 职责: 每次变更记录一条历史，供撤销（LIFO）使用
// ==========================================

use crate::domain::train::{Train, TrainSpec};
use crate::domain::types::TrainId;
use serde::{Deserialize, Serialize};

/// 列车变更前的完整字段快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSnapshot {
    pub id: TrainId,
    pub spec: TrainSpec,
}

impl From<&Train> for TrainSnapshot {
    fn from(train: &Train) -> Self {
        Self {
            id: train.id,
            spec: train.spec().clone(),
        }
    }
}

// ==========================================
// HistoryEntry - 历史记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum HistoryEntry {
    Admitted(TrainId),          // 接纳：撤销时删除该ID
    Removed(TrainSnapshot),     // 删除：撤销时按快照重建
    Modified(TrainSnapshot),    // 修改：撤销时回写快照字段
}

impl HistoryEntry {
    pub fn train_id(&self) -> TrainId {
        match self {
            HistoryEntry::Admitted(id) => *id,
            HistoryEntry::Removed(snapshot) | HistoryEntry::Modified(snapshot) => snapshot.id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryEntry::Admitted(_) => "admitted",
            HistoryEntry::Removed(_) => "removed",
            HistoryEntry::Modified(_) => "modified",
        }
    }
}

// ==========================================
// History - 线性历史栈
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_lifo() {
        let mut history = History::new();
        history.record(HistoryEntry::Admitted(1));
        history.record(HistoryEntry::Admitted(2));

        assert_eq!(history.peek().map(HistoryEntry::train_id), Some(2));
        assert_eq!(history.pop(), Some(HistoryEntry::Admitted(2)));
        assert_eq!(history.pop(), Some(HistoryEntry::Admitted(1)));
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_entry_serializes_tagged() {
        let json = serde_json::to_value(HistoryEntry::Admitted(7)).unwrap();
        assert_eq!(json["action"], "admitted");
        assert_eq!(json["payload"], 7);
    }
}

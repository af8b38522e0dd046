// ==========================================
// 车辆段股道排程系统 - 引擎层事件发布
// ==========================================
// 职责: 定义排程事件发布 trait，实现依赖倒置
// 说明: 引擎层定义 trait，外部读模型/推送层实现
// ==========================================

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::types::TrainId;

// ==========================================
// 排程事件类型
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleEventType {
    /// 接纳列车
    TrainAdmitted,
    /// 修改列车
    TrainUpdated,
    /// 删除列车
    TrainRemoved,
    /// 撤销
    UndoApplied,
    /// 新增车辆段
    DepotAdded,
    /// 重置
    Reset,
    /// 手动重算
    ManualRecalc,
}

impl ScheduleEventType {
    pub fn as_str(&self) -> &str {
        match self {
            ScheduleEventType::TrainAdmitted => "TrainAdmitted",
            ScheduleEventType::TrainUpdated => "TrainUpdated",
            ScheduleEventType::TrainRemoved => "TrainRemoved",
            ScheduleEventType::UndoApplied => "UndoApplied",
            ScheduleEventType::DepotAdded => "DepotAdded",
            ScheduleEventType::Reset => "Reset",
            ScheduleEventType::ManualRecalc => "ManualRecalc",
        }
    }
}

/// 排程事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub event_id: Uuid,
    pub event_type: ScheduleEventType,
    /// 受影响的列车（车辆段级事件为 None）
    pub train_id: Option<TrainId>,
    /// 受影响的车辆段
    pub depot: Option<String>,
    pub occurred_at: NaiveDateTime,
}

impl ScheduleEvent {
    pub fn new(event_type: ScheduleEventType, train_id: Option<TrainId>, depot: Option<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            train_id,
            depot,
            occurred_at: Utc::now().naive_utc(),
        }
    }
}

// ==========================================
// 事件发布 Trait
// ==========================================

/// 排程事件发布者
///
/// # 实现说明
/// - 发布失败只记录日志，不影响已完成的变更
pub trait ScheduleEventPublisher: Send + Sync {
    fn publish(&self, event: ScheduleEvent) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// 空操作事件发布者（单元测试/无下游场景）
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl ScheduleEventPublisher for NoOpEventPublisher {
    fn publish(&self, event: ScheduleEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        tracing::debug!(
            "NoOpEventPublisher: 跳过事件发布 - event_type={}, train_id={:?}",
            event.event_type.as_str(),
            event.train_id
        );
        Ok(())
    }
}

// ==========================================
// 可选事件发布者包装
// ==========================================

#[derive(Clone, Default)]
pub struct OptionalEventPublisher {
    inner: Option<Arc<dyn ScheduleEventPublisher>>,
}

impl OptionalEventPublisher {
    pub fn with_publisher(publisher: Arc<dyn ScheduleEventPublisher>) -> Self {
        Self {
            inner: Some(publisher),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// 发布事件（未配置发布者时静默跳过）
    pub fn publish(&self, event: ScheduleEvent) {
        let Some(publisher) = &self.inner else {
            return;
        };
        let event_type = event.event_type;
        if let Err(e) = publisher.publish(event) {
            tracing::warn!("事件发布失败(忽略): event_type={}, error={}", event_type.as_str(), e);
        }
    }
}

impl std::fmt::Debug for OptionalEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionalEventPublisher")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

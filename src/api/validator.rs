// ==========================================
// 车辆段股道排程系统 - 列车录入校验器
// ==========================================
// 职责: 接纳/编辑前的输入校验
// 规则: 到达早于出发 / 长度为正 / 车辆段存在 / 同名列车时间窗不重叠
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::depot::DepotRegistry;
use crate::domain::train::{Train, TrainSpec};
use crate::domain::types::TrainId;

/// 列车录入校验器（无状态）
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainValidator;

impl TrainValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验列车录入参数
    ///
    /// # 参数
    /// - spec: 待写入的参数
    /// - depots: 车辆段目录
    /// - trains: 现有列车
    /// - editing: 编辑场景下被编辑列车的ID（重叠检查时排除自身）
    pub fn validate(
        &self,
        spec: &TrainSpec,
        depots: &DepotRegistry,
        trains: &[Train],
        editing: Option<TrainId>,
    ) -> ApiResult<()> {
        if spec.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("列车名称不能为空".to_string()));
        }
        if spec.arrival >= spec.departure {
            return Err(ApiError::InvalidInput(format!(
                "到达时刻必须早于出发时刻: arrival={}, departure={}",
                spec.arrival, spec.departure
            )));
        }
        match spec.checked_length_m() {
            None => {
                return Err(ApiError::InvalidInput(format!(
                    "列车编组超出范围: wagons={}, locomotives={}",
                    spec.wagons, spec.locomotives
                )));
            }
            Some(0) => return Err(ApiError::InvalidInput("列车长度必须为正".to_string())),
            Some(_) => {}
        }
        if !depots.contains(&spec.depot) {
            return Err(ApiError::UnknownDepot(spec.depot.clone()));
        }

        let clash = trains
            .iter()
            .filter(|t| Some(t.id) != editing)
            .find(|t| t.name() == spec.name && spec.overlaps(t.arrival(), t.departure()));
        if let Some(existing) = clash {
            return Err(ApiError::DuplicateBooking {
                name: spec.name.clone(),
                arrival: existing.arrival().to_string(),
                departure: existing.departure().to_string(),
            });
        }

        Ok(())
    }
}

// ==========================================
// 车辆段股道排程系统 - 命令行入口
// ==========================================
// 用法: depot-aps [trains.json]
// trains.json: TrainSpec 数组；缺省时使用内置示例
// 输出: 本地安置 / 全局试算 / 统计（JSON）
// ==========================================

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use depot_aps::app::{get_default_config_path, AppState};
use depot_aps::config::SchedulerConfig;
use depot_aps::{logging, TrainCategory, TrainSpec, LocomotiveSide};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", depot_aps::APP_NAME);
    tracing::info!("系统版本: {}", depot_aps::VERSION);
    tracing::info!("配置路径: {}", get_default_config_path());
    tracing::info!("==================================================");

    let config = SchedulerConfig::load_default().context("加载配置失败")?;
    let state = AppState::from_config(config).context("初始化AppState失败")?;
    let api = state.scheduler_api.clone();

    let specs = match std::env::args().nth(1) {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("读取列车文件失败: {}", path))?;
            serde_json::from_str::<Vec<TrainSpec>>(&raw)
                .with_context(|| format!("解析列车文件失败: {}", path))?
        }
        None => sample_trains(),
    };

    for spec in specs {
        let name = spec.name.clone();
        match api.admit(spec) {
            Ok(id) => tracing::info!("列车{}已接纳: id={}", name, id),
            Err(e) => tracing::warn!("列车{}被拒绝: {}", name, e),
        }
    }

    let local = api.get_local_placement()?;
    let global = api.get_global_placement()?;
    let stats = api.statistics()?;

    println!("{}", serde_json::to_string_pretty(&serde_json::json!({
        "local_placement": local,
        "global_placement": global,
        "statistics": stats,
    }))?);

    Ok(())
}

fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 7, day)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .unwrap_or_default()
}

/// 内置示例：Glostrup 上的三列车 + 一列超长车
fn sample_trains() -> Vec<TrainSpec> {
    let spec = |name: &str, wagons, locomotives, arrival, departure, depot: &str| TrainSpec {
        name: name.to_string(),
        wagons,
        locomotives,
        arrival,
        departure,
        depot: depot.to_string(),
        category: TrainCategory::Storage,
        electric: true,
        locomotive_side: LocomotiveSide::Left,
    };

    vec![
        spec("X", 10, 1, at(1, 8, 0), at(1, 10, 0), "Glostrup"),
        spec("Y", 20, 1, at(1, 8, 30), at(1, 9, 30), "Glostrup"),
        spec("Z", 2, 1, at(1, 9, 0), at(1, 9, 40), "Glostrup"),
        spec("Long", 30, 2, at(1, 12, 0), at(1, 18, 0), "Rivabellosa"),
    ]
}

// ==========================================
// 车辆段股道排程系统 - 日志初始化
// ==========================================
// 级别: RUST_LOG（缺省 info）
// 格式: DEPOT_APS_LOG_FORMAT=json 输出结构化 JSON，其余取值输出文本
// 红线: 只安装一次全局订阅者，重复调用不报错
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 输出格式环境变量
pub const LOG_FORMAT_ENV_VAR: &str = "DEPOT_APS_LOG_FORMAT";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// 解析 DEPOT_APS_LOG_FORMAT 的取值；未设置或无法识别时回落为文本
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// 安装 depot-aps 的全局日志订阅者
///
/// - RUST_LOG 控制过滤，例如 `RUST_LOG=depot_aps::engine=debug` 可查看每次股道查找
/// - DEPOT_APS_LOG_FORMAT=json 时每条事件输出一行 JSON，便于采集排程/重算日志
///
/// ```no_run
/// depot_aps::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = LogFormat::from_env_value(std::env::var(LOG_FORMAT_ENV_VAR).ok().as_deref());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}

/// 测试用订阅者：固定 debug 级别，输出交给测试框架捕获
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::debug!("日志已初始化");
    }

    #[test]
    fn test_log_format_from_env_value() {
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("text")), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value(Some("yaml")), LogFormat::Text);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Text);
    }
}

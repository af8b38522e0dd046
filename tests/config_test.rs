// ==========================================
// 配置加载测试
// ==========================================
// 职责: 验证配置文件加载、环境变量覆盖与车辆段目录读取
// ==========================================


#[cfg(test)]
mod config_test {
    use depot_aps::app::AppState;
    use depot_aps::config::{
        load_config, ConfigError, DepotDirectoryReader, JsonFileDepotDirectory, SchedulerConfig,
        StaticDepotDirectory, CONFIG_ENV_VAR,
    };
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::test_helpers::*;

    fn write_config(raw: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();
        file
    }

    // 本文件中唯一读写环境变量的测试
    #[test]
    fn test_load_default_honours_env_var() {
        let file = write_config(
            r#"{"safety_margin_minutes": 20, "depots": [{"name": "Env", "track_numbers": [3], "track_lengths": [310]}]}"#,
        );
        std::env::set_var(CONFIG_ENV_VAR, file.path());
        let loaded = SchedulerConfig::load_default();
        std::env::remove_var(CONFIG_ENV_VAR);

        let config = loaded.unwrap();
        assert_eq!(config.safety_margin_minutes, 20);
        assert_eq!(config.depots[0].name, "Env");
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let json = serde_json::to_string(&scenario_config()).unwrap();
        let file = write_config(&json);

        let config = SchedulerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config, scenario_config());

        let state = AppState::from_config(config).unwrap();
        let depots = state.scheduler_api.list_depots().unwrap();
        assert_eq!(depots[0].name, SCENARIO_DEPOT);
        assert_eq!(depots[0].track_count, 4);
    }

    #[test]
    fn test_invalid_files_rejected() {
        let duplicate = write_config(
            r#"{"depots": [
                {"name": "A", "track_numbers": [1], "track_lengths": [100]},
                {"name": "A", "track_numbers": [2], "track_lengths": [100]}
            ]}"#,
        );
        assert!(matches!(
            SchedulerConfig::from_json_file(duplicate.path()),
            Err(ConfigError::Invalid(_))
        ));

        let broken = write_config("{ depots: ");
        assert!(matches!(
            SchedulerConfig::from_json_file(broken.path()),
            Err(ConfigError::Parse(_))
        ));

        // 超大安全间隔在加载阶段即被拒绝
        let huge_margin = write_config(r#"{"safety_margin_minutes": 9223372036854775807}"#);
        assert!(matches!(
            SchedulerConfig::from_json_file(huge_margin.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_json_directory_feeds_app_state() {
        let file = write_config(
            r#"{"safety_margin_minutes": 0, "depots": [{"name": "Tight", "track_numbers": [1], "track_lengths": [200], "lat": 55.0, "lon": 12.0}]}"#,
        );
        let reader = JsonFileDepotDirectory::new(file.path());
        assert_eq!(reader.list_depots().await.unwrap().len(), 1);

        let state = AppState::from_directory(&reader).await.unwrap();
        let api = &state.scheduler_api;

        // 安全间隔为 0 时，前车出发即可入线
        let first = api
            .admit(TrainBuilder::new("A").depot("Tight").window(at(8, 0), at(9, 0)).build())
            .unwrap();
        let second = api
            .admit(TrainBuilder::new("B").depot("Tight").window(at(8, 30), at(10, 0)).build())
            .unwrap();
        assert_eq!(api.get_train(first).unwrap().track, Some(1));
        let train = api.get_train(second).unwrap();
        assert_eq!(train.track, Some(1));
        assert_eq!(train.waiting_window.end, Some(at(9, 0)));
    }

    #[tokio::test]
    async fn test_static_directory_defaults() {
        let config = load_config(&StaticDepotDirectory::default()).await.unwrap();
        assert_eq!(config.depots.len(), 12);
        assert_eq!(config.safety_margin_minutes, 10);
    }
}

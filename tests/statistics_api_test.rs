// ==========================================
// 统计与查询 API 测试
// ==========================================
// 职责: 验证统计、每日需求、时刻占用查询与事件发布
// ==========================================


#[cfg(test)]
mod statistics_api_test {
    use depot_aps::api::{ApiError, SchedulerApi};
    use depot_aps::engine::{ScheduleEvent, ScheduleEventPublisher, ScheduleEventType};
    use std::error::Error;
    use std::sync::{Arc, Mutex};

    use crate::test_helpers::*;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<ScheduleEvent>>,
    }

    impl ScheduleEventPublisher for RecordingPublisher {
        fn publish(&self, event: ScheduleEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn scenario_with_xyz() -> SchedulerApi {
        let api = scenario_api();
        api.admit(TrainBuilder::new("X").consist(10, 1).window(at(8, 0), at(10, 0)).electric().build())
            .unwrap();
        api.admit(TrainBuilder::new("Y").consist(16, 4).window(at(8, 30), at(9, 30)).testing().build())
            .unwrap();
        api.admit(TrainBuilder::new("Z").consist(2, 1).window(at(9, 0), at(9, 40)).build())
            .unwrap();
        api
    }

    // ==========================================
    // 统计
    // ==========================================

    #[test]
    fn test_statistics_occupancy_and_waiting() {
        let api = scenario_with_xyz();
        let stats = api.statistics().unwrap();

        assert_eq!(stats.total_trains, 3);
        assert_eq!(stats.electric_trains, 1);
        assert_eq!(stats.mean_waiting_minutes, 0.0);
        // (120 + 60 + 40) / (4 * 1440) = 3.8%
        assert_eq!(stats.global_occupancy_pct, 3.8);
        assert_eq!(stats.per_depot.len(), 1);
        assert_eq!(stats.per_depot[0].train_count, 3);
        assert_eq!(stats.per_depot[0].occupancy_pct, 3.8);
    }

    #[test]
    fn test_mean_waiting_ignores_indefinite() {
        let api = scenario_api();
        for name in ["A", "B", "C", "D"] {
            api.admit(TrainBuilder::new(name).window(at(8, 0), at(10, 0)).build())
                .unwrap();
        }
        api.admit(TrainBuilder::new("E").window(at(9, 0), at(12, 0)).build())
            .unwrap();
        api.admit(TrainBuilder::new("Long").consist(40, 0).build())
            .unwrap();

        // 只有 E 等待 70 分钟，其余 4 列为 0，无限期等待不计入
        let stats = api.statistics().unwrap();
        assert_eq!(stats.mean_waiting_minutes, 14.0);
    }

    #[test]
    fn test_daily_requirements() {
        let api = scenario_with_xyz();
        api.admit(
            TrainBuilder::new("Next")
                .consist(5, 2)
                .window(at_day(2, 8, 0), at_day(2, 9, 0))
                .testing()
                .build(),
        )
        .unwrap();

        let reqs = api.daily_requirements().unwrap();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].test_drivers, 1);
        assert_eq!(reqs[0].locomotives, 6);
        assert_eq!(reqs[0].depots_test_drivers, vec![SCENARIO_DEPOT.to_string()]);
        assert_eq!(reqs[1].locomotives, 2);
        assert_eq!(reqs[1].test_drivers, 1);
    }

    // ==========================================
    // 时刻占用查询
    // ==========================================

    #[test]
    fn test_occupancy_at_instant() {
        let api = scenario_with_xyz();

        let mut records = api.occupancy_at(at(9, 15), Some(SCENARIO_DEPOT)).unwrap();
        records.sort_by_key(|r| r.track);
        let tracks: Vec<u32> = records.iter().map(|r| r.track).collect();
        assert_eq!(tracks, vec![1, 2, 4]);
        assert_eq!(records[0].train_name, "X");

        // 端点闭合: 10:00 时 X 仍计入
        let at_ten = api.occupancy_at(at(10, 0), None).unwrap();
        assert_eq!(at_ten.len(), 1);
        assert_eq!(at_ten[0].train_name, "X");

        assert!(api.occupancy_at(at(7, 0), None).unwrap().is_empty());
        assert!(matches!(
            api.occupancy_at(at(9, 0), Some("Nowhere")),
            Err(ApiError::UnknownDepot(_))
        ));
    }

    #[test]
    fn test_depot_snapshot_contents() {
        let api = scenario_with_xyz();
        let snapshot = api.get_depot_snapshot(SCENARIO_DEPOT).unwrap();

        assert_eq!(snapshot.tracks.len(), 4);
        assert_eq!(snapshot.tracks[2].capacity_m(), 400);
        assert_eq!(snapshot.occupations.len(), 3);
        assert_eq!(snapshot.trains.len(), 3);
        assert!(snapshot.location.is_some());
        assert!(matches!(
            api.get_depot_snapshot("Nowhere"),
            Err(ApiError::UnknownDepot(_))
        ));
    }

    // ==========================================
    // 事件发布
    // ==========================================

    #[test]
    fn test_events_published_for_successful_mutations() {
        let recorder = Arc::new(RecordingPublisher::default());
        let api = SchedulerApi::from_config(&scenario_config())
            .unwrap()
            .with_event_publisher(recorder.clone());

        let id = api.admit(TrainBuilder::new("A").build()).unwrap();
        // 被拒绝的变更不发布事件
        assert!(api.admit(TrainBuilder::new("A").build()).is_err());
        api.edit(id, TrainBuilder::new("A").consist(12, 1).build())
            .unwrap();
        api.remove(id).unwrap();
        api.undo().unwrap();
        api.recalculate().unwrap();
        api.reset().unwrap();

        let events = recorder.events.lock().unwrap();
        let kinds: Vec<ScheduleEventType> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(
            kinds,
            vec![
                ScheduleEventType::TrainAdmitted,
                ScheduleEventType::TrainUpdated,
                ScheduleEventType::TrainRemoved,
                ScheduleEventType::UndoApplied,
                ScheduleEventType::ManualRecalc,
                ScheduleEventType::Reset,
            ]
        );
        assert_eq!(events[0].train_id, Some(id));
        assert_eq!(events[0].depot.as_deref(), Some(SCENARIO_DEPOT));
        assert_ne!(events[0].event_id, events[1].event_id);
    }
}

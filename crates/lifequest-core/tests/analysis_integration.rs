//! Integration tests for the snapshot-to-report pipeline.

use lifequest_core::analysis::Difficulty;
use lifequest_core::{
    AnalysisService, Config, KnowledgeBase, PriorityLabel, SharedAnalyzer, UserSnapshot,
};
use std::sync::Arc;
use std::thread;

fn service() -> AnalysisService {
    AnalysisService::new(Arc::new(KnowledgeBase::builtin().unwrap()))
}

#[test]
fn test_report_from_json_snapshot() {
    let snapshot: UserSnapshot = serde_json::from_str(
        r#"{
            "level": 16,
            "xp": 5400,
            "total_tasks": 300,
            "tasks_completed_today": 4,
            "tasks_completed_this_week": 12,
            "streak_days": 21,
            "friends_count": 3,
            "stress_level": 2,
            "current_hour": 9
        }"#,
    )
    .unwrap();

    let report = service().analyze(&snapshot);

    assert_eq!(report.status.as_ref().unwrap().status, "Master");
    let hard: Vec<_> = report
        .quests
        .iter()
        .filter(|q| q.difficulty == Difficulty::Hard)
        .collect();
    assert_eq!(hard.len(), 2);
    assert!(hard.iter().all(|q| q.xp_reward == 50));
    assert!(report
        .notifications
        .iter()
        .any(|n| n.message.contains("streak")));
    assert_eq!(report.recommendations.priority, PriorityLabel::Low);

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["recommendations"]["health"].is_array());
    assert!(json["analytics"]["rounds"].as_u64().unwrap() >= 2);
}

#[test]
fn test_quest_names_are_unique() {
    let snapshot = UserSnapshot {
        stress_level: Some(9.0),
        sitting_hours: Some(9.0),
        current_hour: Some(14),
        ..UserSnapshot::default()
    };
    let report = service().analyze(&snapshot);

    let mut names: Vec<_> = report.quests.iter().map(|q| q.name.clone()).collect();
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn test_configured_ranker_keeps_more_recommendations() {
    let mut config = Config::default();
    config.set_value("ranker.per_category", "3").unwrap();
    let service = AnalysisService::with_config(Arc::new(KnowledgeBase::builtin().unwrap()), &config);

    let snapshot = UserSnapshot {
        stress_level: Some(9.0),
        sitting_hours: Some(8.0),
        current_hour: Some(14),
        ..UserSnapshot::default()
    };
    let report = service.analyze(&snapshot);
    assert_eq!(report.recommendations.health.len(), 3);
    let cfs: Vec<f64> = report.recommendations.health.iter().map(|r| r.confidence).collect();
    assert!(cfs.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_builtin_master_and_marathon_quests_are_hard() {
    let kb = KnowledgeBase::builtin().unwrap();
    let quests: Vec<String> = kb
        .rules()
        .iter()
        .flat_map(|rule| &rule.actions)
        .filter(|action| action.fact == "available_quests")
        .map(|action| action.value.to_string())
        .collect();

    let hard: Vec<&String> = quests
        .iter()
        .filter(|name| {
            let lowered = name.to_lowercase();
            lowered.contains("master") || lowered.contains("marathon")
        })
        .collect();
    assert_eq!(hard.len(), 2);
    for name in hard {
        assert_eq!(Difficulty::from_name(name), Difficulty::Hard, "{name}");
    }
}

#[test]
fn test_from_config_uses_custom_knowledge_base() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.toml");
    std::fs::write(
        &path,
        r#"
        [[rules]]
        id = "everyone_is_a_hero"
        actions = [{ fact = "user_status", value = "Hero" }]
        "#,
    )
    .unwrap();

    let mut config = Config::default();
    config.knowledge_base = Some(path);
    let report = AnalysisService::from_config(&config)
        .unwrap()
        .analyze(&UserSnapshot::default());

    assert_eq!(report.status.unwrap().status, "Hero");
    assert!(report.fuzzy.is_none());
    assert!(report.quests.is_empty());
}

#[test]
fn test_shared_analyzer_across_threads() {
    let analyzer = Arc::new(SharedAnalyzer::new(service()));

    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let analyzer = Arc::clone(&analyzer);
            thread::spawn(move || {
                let snapshot = UserSnapshot {
                    level: 1 + i * 6,
                    current_hour: Some(10),
                    ..UserSnapshot::default()
                };
                analyzer.analyze(&snapshot).unwrap()
            })
        })
        .collect();

    let statuses: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().status.unwrap().status)
        .collect();
    assert_eq!(statuses, vec!["Novice", "Adventurer", "Adventurer", "Master"]);
}

//! Integration tests for loading knowledge bases from disk.

use lifequest_core::{KnowledgeBase, KnowledgeBaseError};
use std::fs;

#[test]
fn test_load_toml_and_json_by_extension() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("rules.toml");
    fs::write(
        &toml_path,
        r#"
        [[rules]]
        id = "sit"
        conditions = [{ fact = "sitting_hours", op = "greater", value = 6 }]
        actions = [{ fact = "needs_break", value = true }]
        "#,
    )
    .unwrap();
    let kb = KnowledgeBase::load(&toml_path).unwrap();
    assert_eq!(kb.summary().rules, 1);
    assert_eq!(kb.rule("sit").unwrap().actions[0].confidence, 1.0);

    let json_path = dir.path().join("rules.JSON");
    fs::write(&json_path, r#"{"list_facts": ["tips"]}"#).unwrap();
    let kb = KnowledgeBase::load(&json_path).unwrap();
    assert_eq!(kb.summary().list_facts, 1);
}

#[test]
fn test_load_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.yaml");
    fs::write(&path, "rules: []").unwrap();

    let err = KnowledgeBase::load(&path).unwrap_err();
    assert_eq!(err, KnowledgeBaseError::UnsupportedFormat(path));
}

#[test]
fn test_load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = KnowledgeBase::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::ReadFailed { .. }));
}

#[test]
fn test_malformed_set_shape_names_variable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(
        &path,
        r#"
        [fuzzy.variables.stress.sets]
        high = [10, 6, 8]
        "#,
    )
    .unwrap();

    let err = KnowledgeBase::load(&path).unwrap_err();
    assert!(matches!(
        err,
        KnowledgeBaseError::InvalidSetShape { ref variable, ref set, .. }
            if variable == "stress" && set == "high"
    ));
}

#[test]
fn test_builtin_source_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("builtin.toml");
    fs::write(&path, KnowledgeBase::builtin_source()).unwrap();

    let from_disk = KnowledgeBase::load(&path).unwrap();
    assert_eq!(from_disk.summary(), KnowledgeBase::builtin().unwrap().summary());
}

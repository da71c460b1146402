use super::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = crate::db::open_in_memory().unwrap();
    Arc::new(Mutex::new(conn))
}

fn make_test_log(action_id: &str, minute: u32) -> ActionLog {
    ActionLog {
        action_id: action_id.to_string(),
        action_type: ActionType::UpdatePackSizes.to_string(),
        action_ts: NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap(),
        actor: "api".to_string(),
        payload_json: Some(serde_json::json!({ "pack_sizes": [250, 500] })),
        detail: Some("test".to_string()),
    }
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = ActionLogRepository::new(setup_test_db());

    let log = make_test_log("log1", 0);
    assert_eq!(repo.insert(&log).unwrap(), "log1");

    let found = repo.find_by_id("log1").unwrap().unwrap();
    assert_eq!(found.action_type, "UpdatePackSizes");
    assert_eq!(found.action_ts, log.action_ts);
    assert_eq!(found.payload_json, log.payload_json);

    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_list_recent_newest_first() {
    let repo = ActionLogRepository::new(setup_test_db());
    repo.insert(&make_test_log("a", 1)).unwrap();
    repo.insert(&make_test_log("b", 3)).unwrap();
    repo.insert(&make_test_log("c", 2)).unwrap();

    let ids: Vec<String> = repo
        .list_recent(2)
        .unwrap()
        .into_iter()
        .map(|l| l.action_id)
        .collect();
    assert_eq!(ids, vec!["b", "c"]);
    assert_eq!(repo.count_by_type("UpdatePackSizes").unwrap(), 3);
}

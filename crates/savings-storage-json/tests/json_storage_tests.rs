use std::fs;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use savings_core::{
    storage::{load_goals, save_goals},
    AmountPolicy, ContributionService, FixedClock, GoalService, KeyValueStore, NewGoal,
    GOALS_STORAGE_KEY,
};
use savings_domain::GoalLedger;
use savings_storage_json::JsonFileStore;
use tempfile::tempdir;

fn store_in(dir: &std::path::Path, retention: usize) -> JsonFileStore {
    JsonFileStore::with_retention(dir.join("data"), dir.join("backups"), retention)
        .expect("create store")
}

#[test]
fn missing_document_reads_as_none() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path(), 5);
    assert!(store.get(GOALS_STORAGE_KEY).expect("get").is_none());
    assert!(load_goals(&store).expect("load").is_empty());
}

#[test]
fn goals_round_trip_through_the_file() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path(), 5);

    let mut ledger = GoalLedger::new();
    let goal = GoalService::create(
        &mut ledger,
        NewGoal::new("Road trip", dec!(2400))
            .with_initial_amount(dec!(300))
            .with_deadline(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()),
        &FixedClock::on(2024, 1, 15),
    )
    .expect("create goal");
    ContributionService::add(
        &mut ledger,
        goal.id,
        dec!(125.75),
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        AmountPolicy::default(),
    )
    .expect("add contribution");

    save_goals(&store, &ledger).expect("save");
    let path = store.document_path(GOALS_STORAGE_KEY);
    assert!(path.ends_with("savings_goals.json"));
    assert!(!path.with_extension("json.tmp").exists());

    let reopened = store_in(dir.path(), 5);
    let loaded = load_goals(&reopened).expect("load");
    assert_eq!(loaded, ledger);
}

#[test]
fn overwriting_keeps_previous_version_as_backup() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path(), 5);

    store.set("notes", "first").expect("first write");
    assert!(store.list_backups("notes").expect("list").is_empty());

    store.set("notes", "second").expect("second write");
    let backups = store.list_backups("notes").expect("list");
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0].path).unwrap(), "first");
    assert!(backups[0].created_at.is_some());
    assert_eq!(store.get("notes").unwrap().as_deref(), Some("second"));
}

#[test]
fn backups_are_pruned_to_retention_newest_first() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path(), 2);

    for version in 0..5 {
        store.set("notes", &format!("v{version}")).expect("write");
    }

    let backups = store.list_backups("notes").expect("list");
    assert_eq!(backups.len(), 2);
    let contents: Vec<String> = backups
        .iter()
        .map(|info| fs::read_to_string(&info.path).unwrap())
        .collect();
    assert_eq!(contents, ["v3", "v2"]);
}

#[test]
fn restore_backup_replaces_live_document() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path(), 5);
    store.set("notes", "original").expect("write");
    store.set("notes", "changed").expect("write");

    let backup = store.list_backups("notes").expect("list").remove(0);
    let restored = store.restore_backup("notes", &backup.id).expect("restore");
    assert_eq!(restored, "original");
    assert_eq!(store.get("notes").unwrap().as_deref(), Some("original"));

    store.delete_backup("notes", &backup.id).expect("delete");
    assert!(store.restore_backup("notes", &backup.id).is_err());
}

mod common;

use savings_calc::{
    calculation::CalculationRecord,
    session::CalculationSession,
    storage::CalculationStore,
    sync::{RemoteStorage, SyncHandler},
};

#[test]
fn saved_calculation_round_trips_through_remote() {
    let (store, remote) = common::setup_test_env();
    let mut session = CalculationSession::new();
    session.set_income("1500");
    session.add_row_with("rent", "700");
    session.save(&store, "May").unwrap();

    let mut sync = SyncHandler::new(remote.clone());
    let json = store.load_raw("May").unwrap();
    let uploaded = sync.upload_or_update("May", json.as_bytes()).unwrap();
    assert_eq!(uploaded.name, "May.json");

    let mut other_device = SyncHandler::new(remote);
    other_device.refresh().unwrap();
    assert_eq!(other_device.calculation_names(), vec!["May".to_string()]);

    let (file, contents) = other_device.fetch("May").unwrap();
    let mut restored = CalculationSession::new();
    assert_eq!(restored.load_json(&file.name, &contents).unwrap(), 800);
    assert_eq!(restored.loaded_name(), Some("May"));
    assert_eq!(restored.to_record(), session.to_record());
}

#[test]
fn resaving_updates_existing_remote_file() {
    let (_, remote) = common::setup_test_env();
    let mut sync = SyncHandler::new(remote.clone());
    sync.refresh().unwrap();

    let first = CalculationRecord::new("10", [("a", "1")]).to_json().unwrap();
    let second = CalculationRecord::new("20", [("b", "2")]).to_json().unwrap();
    let created = sync.upload_or_update("June", first.as_bytes()).unwrap();

    let mut fresh = SyncHandler::new(remote.clone());
    fresh.refresh().unwrap();
    let updated = fresh.upload_or_update("June", second.as_bytes()).unwrap();

    assert_eq!(created.id, updated.id);
    let listing = remote.list().unwrap();
    assert_eq!(listing.len(), 1);
    let (_, body) = remote.download(created.id).unwrap();
    assert_eq!(CalculationRecord::from_json(&body).unwrap().income, "20");
}

#[test]
fn deleting_loaded_remote_calculation() {
    let (_, remote) = common::setup_test_env();
    let mut sync = SyncHandler::new(remote.clone());
    sync.upload_or_update("old", b"{}").unwrap();
    sync.upload_or_update("keep", b"{}").unwrap();

    assert!(sync.select("old").unwrap());
    let removed = sync.delete_loaded().unwrap().expect("loaded file");
    assert_eq!(removed.name, "old.json");
    assert_eq!(sync.calculation_names(), vec!["keep".to_string()]);
    assert_eq!(remote.list().unwrap().len(), 1);
    assert!(!sync.select("old").unwrap());
}

mod common;

use std::fs;

use savings_calc::{
    calculation::{deserialize, serialize, CalculationRecord, CostEntry, RowList},
    errors::CalcError,
    storage::{CalculationStore, CALCULATION_FILE_EXTENSION},
};

#[test]
fn file_format_uses_income_and_costs_fields() {
    let (store, _) = common::setup_test_env();
    let record = CalculationRecord::new("2500", [("rent", "900"), ("phone", "")]);

    let path = store.save("household", &record).expect("save");
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some(format!("household{}", CALCULATION_FILE_EXTENSION).as_str())
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "income": "2500",
            "costs": [
                { "description": "rent", "cost": "900" },
                { "description": "phone", "cost": "" }
            ]
        })
    );
}

#[test]
fn roundtrip_keeps_row_list_order_after_edits() {
    let mut rows = RowList::new();
    let first = rows.add_row_with("R1", "10");
    let second = rows.add_row_with("R2", "20");
    rows.add_row_with("R3", "30");
    rows.remove_row(second).unwrap();
    rows.add_row_with("R4", "");
    rows.get_mut(first).unwrap().cost = "15".into();

    let json = serialize("100", rows.rows()).unwrap();
    let record = deserialize(&json).unwrap();

    assert_eq!(record.income, "100");
    assert_eq!(
        record.costs,
        vec![
            CostEntry::new("R1", "15"),
            CostEntry::new("R3", "30"),
            CostEntry::new("R4", ""),
        ]
    );
    assert_eq!(record.savable(), 55);
}

#[test]
fn files_from_first_release_still_load() {
    let (store, _) = common::setup_test_env();
    let legacy = r#"{
        "allInComingMoney": 1200,
        "fixCosts": [
            { "description": "rent", "cost": 500 },
            { "description": "rent", "cost": 500 }
        ]
    }"#;
    fs::write(store.path_for("legacy").unwrap(), legacy).unwrap();

    let record = store.load("legacy").expect("legacy load");
    assert_eq!(record.income, "1200");
    assert_eq!(record.costs.len(), 2);
    assert_eq!(record.savable(), 200);
}

#[test]
fn overwrite_replaces_without_merging() {
    let (store, _) = common::setup_test_env();
    store
        .save("plan", &CalculationRecord::new("1", [("a", "1"), ("b", "2")]))
        .unwrap();
    store
        .save("plan", &CalculationRecord::new("2", [("c", "3")]))
        .unwrap();

    let loaded = store.load("plan").unwrap();
    assert_eq!(loaded.costs, vec![CostEntry::new("c", "3")]);
}

#[test]
fn invalid_names_never_touch_disk() {
    let (store, _) = common::setup_test_env();
    let err = store
        .save("../outside", &CalculationRecord::default())
        .unwrap_err();
    assert!(matches!(err, CalcError::InvalidName(_)));
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn truncated_file_is_rejected_as_malformed() {
    let (store, _) = common::setup_test_env();
    let json = serialize("10", [("rent", "5")]).unwrap();
    fs::write(store.path_for("cut").unwrap(), &json[..json.len() / 2]).unwrap();

    assert!(store.load("cut").unwrap_err().is_malformed());
}

//! 시나리오 저장소 동작 테스트.
use invoice_roi_toolbox::roi::{compute, BiasConfig, ScenarioInputs};
use invoice_roi_toolbox::store::{ScenarioStore, StoreError};
use tempfile::TempDir;

fn inputs(volume: u32) -> ScenarioInputs {
    ScenarioInputs {
        monthly_invoice_volume: volume,
        avg_hours_per_invoice: 0.17,
        hourly_wage: 30.0,
        error_rate_manual: 0.5,
        error_cost: 100.0,
        time_horizon_months: 36,
        one_time_implementation_cost: 50_000.0,
    }
}

fn save(store: &mut ScenarioStore, name: &str, volume: u32) -> String {
    let i = inputs(volume);
    let r = compute(&i, &BiasConfig::default());
    store.save(name, i, r).expect("save").id
}

#[test]
fn save_by_existing_name_overwrites_and_keeps_id() {
    let mut store = ScenarioStore::in_memory();
    let first = save(&mut store, "baseline", 2000);
    let created = store.get(&first).expect("get").created_at;

    let second = save(&mut store, "baseline", 3000);
    assert_eq!(first, second);
    assert_eq!(store.list().len(), 1);

    let record = store.get(&first).expect("get");
    assert_eq!(record.inputs.monthly_invoice_volume, 3000);
    assert_eq!(record.created_at, created);
    assert!(record.updated_at >= created);
}

#[test]
fn list_orders_by_most_recent_update() {
    let mut store = ScenarioStore::in_memory();
    let a = save(&mut store, "a", 100);
    std::thread::sleep(std::time::Duration::from_millis(5));
    let b = save(&mut store, "b", 200);
    std::thread::sleep(std::time::Duration::from_millis(5));
    save(&mut store, "a", 300);

    let ids: Vec<String> = store.list().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn unknown_id_is_not_found() {
    let mut store = ScenarioStore::in_memory();
    assert!(matches!(store.get("missing"), Err(StoreError::NotFound(id)) if id == "missing"));
    assert!(matches!(store.delete("missing"), Err(StoreError::NotFound(_))));
}

#[test]
fn delete_removes_record() {
    let mut store = ScenarioStore::in_memory();
    let id = save(&mut store, "gone", 100);
    store.delete(&id).expect("delete");
    assert!(store.list().is_empty());
    assert!(store.get(&id).is_err());
}

#[test]
fn stored_result_is_a_snapshot() {
    let mut store = ScenarioStore::in_memory();
    let i = inputs(2000);
    let boosted = compute(
        &i,
        &BiasConfig {
            min_roi_boost_factor: 2.0,
            ..BiasConfig::default()
        },
    );
    let id = store.save("boosted", i, boosted.clone()).expect("save").id;
    assert_eq!(store.get(&id).expect("get").results, boosted);
}

#[test]
fn file_store_survives_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("data").join("scenarios.json");

    let id = {
        let mut store = ScenarioStore::open(&path).expect("open");
        let id = save(&mut store, "persisted", 2000);
        store.record_lead("ap@example.com", Some(&id)).expect("lead");
        id
    };

    let store = ScenarioStore::open(&path).expect("reopen");
    let record = store.get(&id).expect("get");
    assert_eq!(record.name, "persisted");
    assert_eq!(record.results.roi_percentage.map(|v| v.round()), Some(740.0));
    assert_eq!(store.leads().len(), 1);
    assert_eq!(store.leads()[0].scenario_id.as_deref(), Some(id.as_str()));
}

#[test]
fn corrupt_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("scenarios.json");
    std::fs::write(&path, "{ not json").expect("write");
    assert!(matches!(ScenarioStore::open(&path), Err(StoreError::Json(_))));
}

#[test]
fn non_finite_result_is_refused_and_file_stays_readable() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("scenarios.json");
    let mut store = ScenarioStore::open(&path).expect("open");
    let kept = save(&mut store, "ok", 2000);

    let huge = ScenarioInputs {
        monthly_invoice_volume: 4_000_000_000,
        avg_hours_per_invoice: 1e300,
        hourly_wage: 1e10,
        ..inputs(1)
    };
    let r = compute(&huge, &BiasConfig::default());
    assert!(matches!(store.save("huge", huge, r), Err(StoreError::NonFinite(_))));
    assert_eq!(store.list().len(), 1);

    let reopened = ScenarioStore::open(&path).expect("reopen");
    assert_eq!(reopened.list().len(), 1);
    assert!(reopened.get(&kept).is_ok());
}

#[test]
fn failed_write_leaves_memory_unchanged() {
    let dir = TempDir::new().expect("tempdir");
    let data_dir = dir.path().join("data");
    let path = data_dir.join("scenarios.json");
    let mut store = ScenarioStore::open(&path).expect("open");
    let id = save(&mut store, "kept", 2000);

    // 저장 디렉터리를 일반 파일로 바꿔 이후 쓰기가 실패하게 한다.
    std::fs::remove_dir_all(&data_dir).expect("remove dir");
    std::fs::write(&data_dir, "not a directory").expect("write file");

    let i = inputs(3000);
    let r = compute(&i, &BiasConfig::default());
    assert!(matches!(store.save("new", i.clone(), r.clone()), Err(StoreError::Io(_))));
    assert!(matches!(store.save("kept", i, r), Err(StoreError::Io(_))));
    assert!(matches!(store.delete(&id), Err(StoreError::Io(_))));
    assert!(matches!(store.record_lead("ap@example.com", None), Err(StoreError::Io(_))));

    let rows = store.list();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(store.get(&id).expect("get").inputs.monthly_invoice_volume, 2000);
    assert!(store.leads().is_empty());
}

#[test]
fn failed_write_on_unwritable_parent_is_not_visible() {
    let dir = TempDir::new().expect("tempdir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file").expect("write file");
    let mut store = ScenarioStore::open(blocker.join("scenarios.json")).expect("open");

    let i = inputs(2000);
    let r = compute(&i, &BiasConfig::default());
    assert!(store.save("ghost", i, r).is_err());
    assert!(store.list().is_empty());
}

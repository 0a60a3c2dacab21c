//! Startup failures: a store that cannot serve the dashboard is fatal.

use insights_core::{
    config::DashboardConfig, dashboard::Dashboard, error::InsightsError, store::InsightsStore,
};

fn temp_db(name: &str) -> String {
    let path = std::env::temp_dir().join(format!("insights-store-{}-{name}", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path.to_string_lossy().into_owned()
}

#[test]
fn missing_file_is_store_unavailable() {
    let path = temp_db("missing.db");
    assert!(matches!(
        InsightsStore::open_read_only(&path),
        Err(InsightsError::StoreUnavailable { .. })
    ));
}

/// A database without the fact tables is rejected before any view runs.
#[test]
fn database_without_fact_tables_is_rejected() {
    let path = temp_db("empty.db");
    drop(InsightsStore::open(&path).unwrap());

    match InsightsStore::open_read_only(&path) {
        Err(InsightsError::StoreUnavailable { path: p, reason }) => {
            assert_eq!(p, path);
            assert!(reason.contains("missing fact table"), "{reason}");
        }
        other => panic!("expected StoreUnavailable, got {:?}", other.err()),
    }
}

#[test]
fn migrated_database_opens_read_only() {
    let path = temp_db("facts.db");
    let store = InsightsStore::open(&path).unwrap();
    store.migrate().unwrap();
    drop(store);

    let store = InsightsStore::open_read_only(&path).unwrap();
    assert_eq!(store.path(), Some(path.as_str()));
    assert_eq!(store.transaction_fact_count().unwrap(), 0);
    assert_eq!(InsightsStore::in_memory().unwrap().path(), None);
}

#[test]
fn dashboard_open_fails_without_store() {
    let config = DashboardConfig {
        database_path: temp_db("absent.db"),
        ..DashboardConfig::default_test()
    };
    assert!(matches!(
        Dashboard::open(config),
        Err(InsightsError::StoreUnavailable { .. })
    ));
}

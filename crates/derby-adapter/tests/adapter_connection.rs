//! Connection setup, version gating and schema-cache behavior.

mod common;

use common::MockDriver;
use derby_adapter::prelude::*;
use derby_adapter::{CURRENT_SCHEMA_SQL, DEGRADED_ALIVE_SQL};

#[tokio::test]
async fn test_rejects_engine_below_minimum() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 4);

    let result =
        DerbyAdapter::connect_with_capability(driver, AdapterConfig::default(), &CAP).await;

    match result {
        Err(AdapterError::ConnectionNotEstablished(message)) => {
            assert!(message.contains("10.5"));
            assert!(message.contains("10.4"));
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected ConnectionNotEstablished"),
    }
}

#[tokio::test]
async fn test_mid_versions_install_degraded_liveness_query() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 6);

    let adapter = DerbyAdapter::connect_with_capability(driver, AdapterConfig::default(), &CAP)
        .await
        .unwrap();

    assert_eq!(
        adapter.config().connection_alive_sql.as_deref(),
        Some(DEGRADED_ALIVE_SQL)
    );
    assert!(!CAP.is_full_support());
}

#[tokio::test]
async fn test_configured_liveness_query_wins() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 6);
    let config = AdapterConfig {
        connection_alive_sql: Some(String::from("VALUES 1")),
        ..AdapterConfig::default()
    };

    let adapter = DerbyAdapter::connect_with_capability(driver, config, &CAP)
        .await
        .unwrap();

    assert_eq!(
        adapter.config().connection_alive_sql.as_deref(),
        Some("VALUES 1")
    );
}

#[tokio::test]
async fn test_new_engine_installs_nothing_and_records_probe() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 8);
    let state = driver.state();

    let adapter = DerbyAdapter::connect_with_capability(driver, AdapterConfig::default(), &CAP)
        .await
        .unwrap();

    assert_eq!(adapter.config().connection_alive_sql, None);
    assert!(CAP.is_full_support());
    assert_eq!(state.lock().unwrap().version_calls, 1);

    // Probed once, the version gate disables itself for later connections:
    // the driver class cannot change mid-process.
    let second = MockDriver::with_version(10, 8);
    let second_state = second.state();
    DerbyAdapter::connect_with_capability(second, AdapterConfig::default(), &CAP)
        .await
        .unwrap();
    assert_eq!(second_state.lock().unwrap().version_calls, 0);
}

#[tokio::test]
async fn test_isolation_defaults_to_serializable() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 8);
    let state = driver.state();

    DerbyAdapter::connect_with_capability(driver, AdapterConfig::default(), &CAP)
        .await
        .unwrap();

    assert_eq!(
        state.lock().unwrap().isolation,
        Some(IsolationLevel::Serializable)
    );
}

#[tokio::test]
async fn test_isolation_opt_out_leaves_connection_alone() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 8);
    let state = driver.state();
    let config = AdapterConfig {
        transaction_isolation: None,
        ..AdapterConfig::default()
    };

    DerbyAdapter::connect_with_capability(driver, config, &CAP)
        .await
        .unwrap();

    assert_eq!(state.lock().unwrap().isolation, None);
}

#[tokio::test]
async fn test_configured_schema_is_applied() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 8);
    let state = driver.state();
    let config = AdapterConfig {
        schema: Some(String::from("REPORTS")),
        ..AdapterConfig::default()
    };

    DerbyAdapter::connect_with_capability(driver, config, &CAP)
        .await
        .unwrap();

    assert!(state
        .lock()
        .unwrap()
        .executed
        .contains(&String::from("SET SCHEMA REPORTS")));
}

#[tokio::test]
async fn test_current_schema_is_cached() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 8).scalar(CURRENT_SCHEMA_SQL, "APP");
    let state = driver.state();

    let mut adapter =
        DerbyAdapter::connect_with_capability(driver, AdapterConfig::default(), &CAP)
            .await
            .unwrap();

    assert_eq!(adapter.current_schema().await.unwrap(), "APP");
    assert_eq!(adapter.current_schema().await.unwrap(), "APP");

    let schema_queries = state
        .lock()
        .unwrap()
        .scalar_calls
        .iter()
        .filter(|sql| sql.as_str() == CURRENT_SCHEMA_SQL)
        .count();
    assert_eq!(schema_queries, 1);
}

#[tokio::test]
async fn test_set_schema_invalidates_cache() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 8).scalar(CURRENT_SCHEMA_SQL, "APP");
    let state = driver.state();

    let mut adapter =
        DerbyAdapter::connect_with_capability(driver, AdapterConfig::default(), &CAP)
            .await
            .unwrap();

    adapter.current_schema().await.unwrap();
    adapter.set_schema("REPORTS").await.unwrap();
    adapter.current_schema().await.unwrap();

    let state = state.lock().unwrap();
    assert!(state.executed.contains(&String::from("SET SCHEMA REPORTS")));
    let schema_queries = state
        .scalar_calls
        .iter()
        .filter(|sql| sql.as_str() == CURRENT_SCHEMA_SQL)
        .count();
    assert_eq!(schema_queries, 2);
}

#[tokio::test]
async fn test_verify_alive_runs_installed_query() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 6);
    let state = driver.state();

    let mut adapter =
        DerbyAdapter::connect_with_capability(driver, AdapterConfig::default(), &CAP)
            .await
            .unwrap();

    assert!(adapter.verify_alive().await.unwrap());
    assert!(state
        .lock()
        .unwrap()
        .scalar_calls
        .contains(&String::from(DEGRADED_ALIVE_SQL)));
}

#[tokio::test]
async fn test_last_insert_id_delegates_to_driver() {
    static CAP: Jdbc4Capability = Jdbc4Capability::new();
    let driver = MockDriver::with_version(10, 8);

    let mut adapter =
        DerbyAdapter::connect_with_capability(driver, AdapterConfig::default(), &CAP)
            .await
            .unwrap();

    assert_eq!(adapter.last_insert_id().await.unwrap(), 42);
}

//! Storage notification adapter tests.

use super::common::{pipeline, record, statements, storage_event};
use pretty_assertions::assert_eq;
use query_dispatch::catalog::{FailingCatalog, InMemoryCatalog};
use query_dispatch::execution::ExecutionStatus::*;
use query_dispatch::trigger::{StorageEventAdapter, TriggerAdapter, NO_RESULTS_MESSAGE};
use serde_json::json;
use std::sync::Arc;

#[tokio::test(start_paused = true)]
async fn test_end_to_end_rows() {
    let statements = Arc::new(
        statements(vec![Submitted, Started, Finished])
            .with_rows(vec![record(&[("col", json!("1"))])]),
    );
    let adapter = StorageEventAdapter::new(
        pipeline(
            InMemoryCatalog::new().with_query("load_orders_from_s3", "SELECT 1"),
            statements.clone(),
        ),
        ".csv",
    );

    let event = json!({
        "Records": [{"s3": {"object": {"key": "orders/load_orders_from_s3.csv"}}}]
    });
    let response = adapter.handle(event).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"statusCode": 200, "records": [{"col": "1"}]})
    );
    assert_eq!(statements.submitted_sql(), vec!["SELECT 1".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_statement_without_result_set() {
    let statements = Arc::new(statements(vec![Picked, Finished]));
    let adapter = StorageEventAdapter::new(
        pipeline(
            InMemoryCatalog::new().with_query("refresh", "REFRESH MATERIALIZED VIEW mv_orders"),
            statements.clone(),
        ),
        ".csv",
    );

    let response = adapter.handle(storage_event("views/refresh.csv")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.message.as_deref(), Some(NO_RESULTS_MESSAGE));
    assert!(response.records.is_none());
    assert_eq!(statements.fetch_calls(), 0);
}

#[tokio::test]
async fn test_dotted_name_keeps_inner_dots() {
    let statements = Arc::new(statements(vec![Finished]));
    let adapter = StorageEventAdapter::new(
        pipeline(
            InMemoryCatalog::new().with_query("c.report", "UNLOAD ('SELECT 1') TO 's3://out/'"),
            statements.clone(),
        ),
        ".csv",
    );

    let response = adapter.handle(storage_event("a/b/c.report.csv")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        statements.submitted_sql(),
        vec!["UNLOAD ('SELECT 1') TO 's3://out/'".to_string()]
    );
}

#[tokio::test]
async fn test_malformed_events_are_400() {
    let statements = Arc::new(statements(vec![Finished]));
    let adapter = StorageEventAdapter::new(
        pipeline(InMemoryCatalog::new(), statements.clone()),
        ".csv",
    );

    for event in [
        json!({}),
        json!({"Records": []}),
        json!({"Records": [{"s3": {"bucket": {"name": "b"}}}]}),
        json!({"Records": [{"s3": {"object": {"size": 3}}}]}),
        json!({"Records": [{"s3": {"object": {"key": "orders/"}}}]}),
    ] {
        let response = adapter.handle(event.clone()).await;
        assert_eq!(response.status_code, 400, "event {event}");
        assert!(response.body.unwrap().starts_with("Could not parse event"));
    }
    assert!(statements.submitted_sql().is_empty());
}

#[tokio::test]
async fn test_unknown_query_is_404() {
    let adapter = StorageEventAdapter::new(
        pipeline(
            InMemoryCatalog::new().with_query("other", "SELECT 2"),
            Arc::new(statements(vec![Finished])),
        ),
        ".csv",
    );

    let response = adapter.handle(storage_event("orders/unknown.csv")).await;

    assert_eq!(response.status_code, 404);
    assert_eq!(response.body.as_deref(), Some("No query found for 'unknown'"));
}

#[tokio::test]
async fn test_catalog_outage_is_500() {
    let adapter = StorageEventAdapter::new(
        pipeline(
            FailingCatalog::new("ResourceNotFoundException: table missing"),
            Arc::new(statements(vec![Finished])),
        ),
        ".csv",
    );

    let response = adapter.handle(storage_event("orders/a.csv")).await;
    assert_eq!(response.status_code, 500);
}

#[tokio::test(start_paused = true)]
async fn test_failed_statement_is_500_with_status() {
    let statements = Arc::new(
        statements(vec![Submitted, Failed])
            .with_error("ERROR: permission denied for relation orders"),
    );
    let adapter = StorageEventAdapter::new(
        pipeline(
            InMemoryCatalog::new().with_query("load", "COPY orders FROM 's3://x'"),
            statements.clone(),
        ),
        ".csv",
    );

    let response = adapter.handle(storage_event("orders/load.csv")).await;

    assert_eq!(response.status_code, 500);
    let body = response.body.unwrap();
    assert!(body.contains("FAILED"), "{body}");
    assert!(body.contains("permission denied"), "{body}");
    assert!(response.records.is_none());
    assert!(response.message.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_slow_statement_times_out_as_500() {
    let statements = Arc::new(statements(vec![Started]));
    let adapter = StorageEventAdapter::new(
        pipeline(
            InMemoryCatalog::new().with_query("slow", "SELECT 1"),
            statements.clone(),
        ),
        ".csv",
    );

    let response = adapter.handle(storage_event("x/slow.csv")).await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.unwrap().contains("still running"));
}

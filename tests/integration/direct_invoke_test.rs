//! Direct invocation adapter tests.

use super::common::{pipeline, record, statements};
use query_dispatch::catalog::InMemoryCatalog;
use query_dispatch::execution::ExecutionStatus::*;
use query_dispatch::trigger::{DirectInvokeAdapter, TriggerAdapter};
use serde_json::json;
use std::sync::Arc;

#[tokio::test(start_paused = true)]
async fn test_runs_named_query() {
    let statements = Arc::new(
        statements(vec![Submitted, Picked, Started, Finished]).with_rows(vec![
            record(&[("region", json!("emea")), ("total", json!(1250))]),
            record(&[("region", json!("apac")), ("total", json!(980))]),
        ]),
    );
    let adapter = DirectInvokeAdapter::new(pipeline(
        InMemoryCatalog::new().with_query(
            "totals_by_region",
            "SELECT region, SUM(amount) AS total FROM orders GROUP BY region",
        ),
        statements.clone(),
    ));

    let response = adapter
        .handle(json!({"query_name": "totals_by_region"}))
        .await;

    assert_eq!(response.status_code, 200);
    let records = response.records.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["region"], json!("emea"));
    assert_eq!(records[1]["total"], json!(980));
    assert_eq!(statements.describe_calls(), 4);
}

#[tokio::test]
async fn test_missing_query_name_is_400() {
    let statements = Arc::new(statements(vec![Finished]));
    let adapter = DirectInvokeAdapter::new(pipeline(InMemoryCatalog::new(), statements.clone()));

    for event in [
        json!({}),
        json!({"query_name": ""}),
        json!({"query_name": null}),
        json!({"name": "q1"}),
        json!([]),
    ] {
        let response = adapter.handle(event.clone()).await;
        assert_eq!(response.status_code, 400, "event {event}");
        assert!(response.body.unwrap().contains("query_name"));
    }
    assert!(statements.submitted_sql().is_empty());
}

#[tokio::test]
async fn test_unknown_query_is_404_not_500() {
    let adapter = DirectInvokeAdapter::new(pipeline(
        InMemoryCatalog::new(),
        Arc::new(statements(vec![Finished])),
    ));

    let response = adapter.handle(json!({"query_name": "nope"})).await;
    assert_eq!(response.status_code, 404);
}

#[tokio::test]
async fn test_submit_failure_is_500() {
    let statements = Arc::new(
        statements(vec![Finished])
            .failing_submit("ValidationException: Cluster redshift-cluster-1 not found"),
    );
    let adapter = DirectInvokeAdapter::new(pipeline(
        InMemoryCatalog::new().with_query("q", "SELECT 1"),
        statements.clone(),
    ));

    let response = adapter.handle(json!({"query_name": "q"})).await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.unwrap().contains("Cluster redshift-cluster-1 not found"));
    assert_eq!(statements.describe_calls(), 0);
}

#[tokio::test]
async fn test_aborted_statement_is_500() {
    let adapter = DirectInvokeAdapter::new(pipeline(
        InMemoryCatalog::new().with_query("q", "SELECT 1"),
        Arc::new(statements(vec![Aborted])),
    ));

    let response = adapter.handle(json!({"query_name": "q"})).await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.unwrap().contains("ABORTED"));
}

#[tokio::test]
async fn test_fetch_failure_after_finish_is_500() {
    let statements = Arc::new(
        statements(vec![Finished])
            .with_rows(vec![])
            .failing_fetch("ResourceNotFoundException: result expired"),
    );
    let adapter = DirectInvokeAdapter::new(pipeline(
        InMemoryCatalog::new().with_query("q", "SELECT 1"),
        statements.clone(),
    ));

    let response = adapter.handle(json!({"query_name": "q"})).await;

    assert_eq!(response.status_code, 500);
    assert!(response.body.unwrap().starts_with("Result fetch error"));
}

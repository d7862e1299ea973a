//! Status check adapter tests.

use super::common::{statements, EXECUTION_ID};
use pretty_assertions::assert_eq;
use query_dispatch::execution::ExecutionStatus::*;
use query_dispatch::trigger::{StatusCheckAdapter, TriggerAdapter};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_reports_current_status_without_waiting() {
    let statements = Arc::new(statements(vec![Started, Finished]));
    let adapter = StatusCheckAdapter::new(statements.clone());

    let response = adapter.handle(json!({"QueryId": EXECUTION_ID})).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"statusCode": 200, "QueryId": EXECUTION_ID, "Status": "STARTED"})
    );
    assert_eq!(statements.describe_calls(), 1);
    assert_eq!(statements.fetch_calls(), 0);
}

#[tokio::test]
async fn test_repeated_checks_are_stable() {
    let statements = Arc::new(statements(vec![Failed]).with_error("syntax error at or near"));
    let adapter = StatusCheckAdapter::new(statements);

    let first = adapter.handle(json!({"QueryId": EXECUTION_ID})).await;
    let second = adapter.handle(json!({"QueryId": EXECUTION_ID})).await;

    assert_eq!(first, second);
    assert_eq!(first.status.as_deref(), Some("FAILED"));
}

#[tokio::test]
async fn test_missing_query_id_is_400() {
    let statements = Arc::new(statements(vec![Finished]));
    let adapter = StatusCheckAdapter::new(statements.clone());

    let response = adapter.handle(json!({"query_id": EXECUTION_ID})).await;

    assert_eq!(response.status_code, 400);
    assert!(response.body.unwrap().contains("QueryId"));
    assert_eq!(statements.describe_calls(), 0);
}

#[tokio::test]
async fn test_unknown_id_is_500() {
    let adapter = StatusCheckAdapter::new(Arc::new(statements(vec![Finished])));

    let response = adapter.handle(json!({"QueryId": "does-not-exist"})).await;

    assert_eq!(response.status_code, 500);
    assert!(response.status.is_none());
}

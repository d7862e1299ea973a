//! Shared fixtures for adapter tests.

use query_dispatch::catalog::QueryCatalog;
use query_dispatch::execution::{
    ClusterRef, CredentialRef, ExecutionStatus, ExecutionTarget, PollPolicy, Record,
    ScriptedStatementService,
};
use query_dispatch::pipeline::QueryPipeline;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const EXECUTION_ID: &str = "5b6a3c1e-8f1d-4e7a-9d0c-1f2e3d4c5b6a";

pub fn target() -> ExecutionTarget {
    ExecutionTarget {
        cluster: ClusterRef::Provisioned("redshift-cluster-1".to_string()),
        database: "dev".to_string(),
        credentials: CredentialRef::Secret(
            "arn:aws:secretsmanager:us-east-1:123456789012:secret:redshift".to_string(),
        ),
        with_event: true,
    }
}

pub fn policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_secs(1),
        max_interval: Duration::from_secs(5),
        backoff: 1.5,
        max_wait: Duration::from_secs(120),
    }
}

pub fn statements(script: Vec<ExecutionStatus>) -> ScriptedStatementService {
    ScriptedStatementService::new(script).with_execution_id(EXECUTION_ID)
}

pub fn pipeline(
    catalog: impl QueryCatalog + 'static,
    statements: Arc<ScriptedStatementService>,
) -> QueryPipeline {
    QueryPipeline::new(Arc::new(catalog), statements, target(), policy())
}

pub fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn storage_event(key: &str) -> Value {
    serde_json::json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": {"name": "landing-zone"},
                "object": {"key": key, "size": 1024}
            }
        }]
    })
}

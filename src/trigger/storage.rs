//! Storage notification adapter.
//!
//! Runs the query named after the object that landed in the bucket. Only the
//! first record of the notification is consulted.

use super::{respond, Response, TriggerAdapter};
use crate::catalog::QueryName;
use crate::error::{DispatchError, Result};
use crate::pipeline::QueryPipeline;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Notification {
    #[serde(rename = "Records")]
    records: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct NotificationRecord {
    s3: StorageEntity,
}

#[derive(Debug, Deserialize)]
struct StorageEntity {
    object: StorageObject,
}

#[derive(Debug, Deserialize)]
struct StorageObject {
    key: String,
}

/// Extracts the object key of the first record in a notification.
pub fn object_key(event: Value) -> Result<String> {
    let notification: Notification = serde_json::from_value(event)
        .map_err(|e| DispatchError::bad_event(e.to_string()))?;

    let total = notification.records.len();
    let first = notification
        .records
        .into_iter()
        .next()
        .ok_or_else(|| DispatchError::bad_event("event has no Records"))?;
    if total > 1 {
        debug!(ignored = total - 1, "only the first record is used");
    }

    let record: NotificationRecord = serde_json::from_value(first)
        .map_err(|e| DispatchError::bad_event(e.to_string()))?;
    Ok(record.s3.object.key)
}

/// Adapter for new-object notifications.
#[derive(Clone)]
pub struct StorageEventAdapter {
    pipeline: QueryPipeline,
    object_suffix: String,
}

impl StorageEventAdapter {
    pub fn new(pipeline: QueryPipeline, object_suffix: impl Into<String>) -> Self {
        Self {
            pipeline,
            object_suffix: object_suffix.into(),
        }
    }

    async fn try_handle(&self, event: Value) -> Result<Response> {
        let key = object_key(event)?;
        let name = QueryName::from_object_key(&key, &self.object_suffix)?;
        debug!(object_key = %key, query_name = %name, "triggering query");

        let outcome = self.pipeline.run(&name).await?;
        Ok(Response::from_outcome(outcome))
    }
}

#[async_trait]
impl TriggerAdapter for StorageEventAdapter {
    async fn handle(&self, event: Value) -> Response {
        respond(self.try_handle(event).await)
    }
}

//! Trigger adapters: turn an inbound event into a pipeline run and a
//! structured response.
//!
//! Adapters never fail. Every error is converted into a `Response` at this
//! boundary, with 4xx for caller mistakes and 500 for downstream failures.

mod direct;
mod response;
mod status;
mod storage;

pub use direct::DirectInvokeAdapter;
pub use response::{Response, NO_RESULTS_MESSAGE};
pub use status::StatusCheckAdapter;
pub use storage::StorageEventAdapter;

use crate::error::{DispatchError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use tracing::{error, warn};

/// Handles one inbound event.
#[async_trait]
pub trait TriggerAdapter: Send + Sync {
    /// Processes `event`, always producing a well-formed response.
    async fn handle(&self, event: Value) -> Response;
}

/// The available adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TriggerKind {
    /// New object notifications from a storage bucket.
    StorageEvent,
    /// Direct invocation with a `query_name`.
    Direct,
    /// Status check for a `QueryId`.
    Status,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StorageEvent => "storage-event",
            Self::Direct => "direct",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a step result into a response, logging failures by category.
fn respond(result: Result<Response>) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => {
            if err.status_code() >= 500 {
                error!(category = err.category(), "{}", err);
            } else {
                warn!(category = err.category(), "{}", err);
            }
            Response::from_error(&err)
        }
    }
}

/// Reads a non-empty string field from an event object.
fn required_str<'a>(event: &'a Value, field: &str) -> Result<&'a str> {
    event
        .get(field)
        .and_then(Value::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DispatchError::missing_parameter(format!("Missing '{field}' in event.")))
}

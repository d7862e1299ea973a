//! Status check adapter: `{"QueryId": "..."}`.
//!
//! Performs a single status lookup. It neither waits nor fetches rows.

use super::{required_str, respond, Response, TriggerAdapter};
use crate::error::Result;
use crate::execution::{ExecutionHandle, StatementService};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Adapter reporting the current status of a submitted statement.
#[derive(Clone)]
pub struct StatusCheckAdapter {
    statements: Arc<dyn StatementService>,
}

impl StatusCheckAdapter {
    pub fn new(statements: Arc<dyn StatementService>) -> Self {
        Self { statements }
    }

    async fn try_handle(&self, event: Value) -> Result<Response> {
        let handle = ExecutionHandle::new(required_str(&event, "QueryId")?);
        let description = self.statements.describe(&handle).await?;
        debug!(execution_id = %handle, status = %description.status, "status checked");
        Ok(Response::from_status(&handle, &description))
    }
}

#[async_trait]
impl TriggerAdapter for StatusCheckAdapter {
    async fn handle(&self, event: Value) -> Response {
        respond(self.try_handle(event).await)
    }
}

//! Direct invocation adapter: `{"query_name": "..."}`.

use super::{required_str, respond, Response, TriggerAdapter};
use crate::catalog::QueryName;
use crate::error::Result;
use crate::pipeline::QueryPipeline;
use async_trait::async_trait;
use serde_json::Value;

/// Adapter that runs the query named in the event.
#[derive(Clone)]
pub struct DirectInvokeAdapter {
    pipeline: QueryPipeline,
}

impl DirectInvokeAdapter {
    pub fn new(pipeline: QueryPipeline) -> Self {
        Self { pipeline }
    }

    async fn try_handle(&self, event: Value) -> Result<Response> {
        let name = QueryName::new(required_str(&event, "query_name")?)?;
        let outcome = self.pipeline.run(&name).await?;
        Ok(Response::from_outcome(outcome))
    }
}

#[async_trait]
impl TriggerAdapter for DirectInvokeAdapter {
    async fn handle(&self, event: Value) -> Response {
        respond(self.try_handle(event).await)
    }
}

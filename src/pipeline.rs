//! The shared query pipeline: name → SQL → submission → terminal status →
//! outcome.
//!
//! Each step either advances or short-circuits with its own error kind;
//! earlier steps are never retried within one invocation.

use crate::catalog::{QueryCatalog, QueryName};
use crate::error::Result;
use crate::execution::{
    resolve, ExecutionOutcome, ExecutionTarget, PollPolicy, Poller, StatementService,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Process-scoped service handles and settings shared by every invocation.
#[derive(Clone)]
pub struct QueryPipeline {
    catalog: Arc<dyn QueryCatalog>,
    statements: Arc<dyn StatementService>,
    target: ExecutionTarget,
    policy: PollPolicy,
}

impl QueryPipeline {
    pub fn new(
        catalog: Arc<dyn QueryCatalog>,
        statements: Arc<dyn StatementService>,
        target: ExecutionTarget,
        policy: PollPolicy,
    ) -> Self {
        Self {
            catalog,
            statements,
            target,
            policy,
        }
    }

    /// Runs the named query to completion.
    pub async fn run(&self, name: &QueryName) -> Result<ExecutionOutcome> {
        info!(query_name = %name, "name resolved");

        let record = self.catalog.lookup(name).await?;
        debug!(query_name = %name, sql_len = record.sql.len(), "sql looked up");

        let handle = self.statements.submit(&record.sql, &self.target).await?;
        info!(query_name = %name, execution_id = %handle, "submitted");

        let description = Poller::new(self.statements.as_ref(), &self.policy)
            .await_terminal(&handle)
            .await?;
        info!(
            query_name = %name,
            execution_id = %handle,
            status = %description.status,
            "terminal"
        );

        let outcome = resolve(self.statements.as_ref(), &handle, &description).await?;
        debug!(query_name = %name, execution_id = %handle, "resolved");
        Ok(outcome)
    }
}

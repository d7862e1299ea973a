//! Turns a terminal statement description into an outcome.

use super::{
    ExecutionHandle, ExecutionOutcome, ExecutionStatus, StatementDescription, StatementService,
};
use crate::error::{DispatchError, Result};
use tracing::debug;

/// Resolves a terminal statement into rows, plain success, or failure.
///
/// Rows are fetched only for a FINISHED statement that reports a result set.
/// A fetch failure at that point is a `ResultFetch` error, never a query
/// failure. Passing a pending status is an internal error.
pub async fn resolve(
    service: &dyn StatementService,
    handle: &ExecutionHandle,
    description: &StatementDescription,
) -> Result<ExecutionOutcome> {
    match description.status {
        ExecutionStatus::Finished if description.has_result_set => {
            let rows = service
                .fetch_result(handle)
                .await
                .map_err(|e| match e {
                    DispatchError::ResultFetch(_) => e,
                    other => DispatchError::result_fetch(other.to_string()),
                })?;
            debug!(execution_id = %handle, rows = rows.len(), "fetched result set");
            Ok(ExecutionOutcome::Rows(rows))
        }
        ExecutionStatus::Finished => Ok(ExecutionOutcome::Success),
        status @ (ExecutionStatus::Failed | ExecutionStatus::Aborted) => {
            Ok(ExecutionOutcome::Failure {
                status,
                detail: description.error.clone().filter(|d| !d.is_empty()),
            })
        }
        pending => Err(DispatchError::internal(format!(
            "cannot resolve statement {handle} while {pending}"
        ))),
    }
}

//! Structured responses returned to the invoking runtime.

use crate::error::DispatchError;
use crate::execution::{ExecutionHandle, ExecutionOutcome, Record, StatementDescription};
use serde::{Deserialize, Serialize};

/// Message reported for statements that finish without a result set.
pub const NO_RESULTS_MESSAGE: &str = "Query executed successfully (no results)";

/// Response to one invocation.
///
/// `records` and `message` are mutually exclusive on success; failures carry
/// only `body`. Status checks add `QueryId` and `Status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(rename = "QueryId", default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,

    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Response {
    fn with_code(status_code: u16) -> Self {
        Self {
            status_code,
            body: None,
            records: None,
            message: None,
            query_id: None,
            status: None,
        }
    }

    /// Builds the response for a failed step.
    pub fn from_error(err: &DispatchError) -> Self {
        Self {
            body: Some(err.to_string()),
            ..Self::with_code(err.status_code())
        }
    }

    /// Builds the response for a resolved statement.
    pub fn from_outcome(outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Rows(records) => Self {
                records: Some(records),
                ..Self::with_code(200)
            },
            ExecutionOutcome::Success => Self {
                message: Some(NO_RESULTS_MESSAGE.to_string()),
                ..Self::with_code(200)
            },
            ExecutionOutcome::Failure { status, detail } => {
                Self::from_error(&DispatchError::ExecutionStatus {
                    status: status.to_string(),
                    detail,
                })
            }
        }
    }

    /// Builds the response for a status check.
    pub fn from_status(handle: &ExecutionHandle, description: &StatementDescription) -> Self {
        Self {
            query_id: Some(handle.execution_id.clone()),
            status: Some(description.status.to_string()),
            ..Self::with_code(200)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

//! Statement execution lifecycle: submit, poll, resolve.
//!
//! Submission is fire-and-forget on the engine side. The poller waits for a
//! terminal status and the resolver turns that status into an outcome.
//! Nothing here cancels a remote statement; once submitted it runs to
//! completion whether or not anyone is still watching.

mod mock;
mod poller;
mod redshift;
mod resolver;

pub use mock::ScriptedStatementService;
pub use poller::{PollPolicy, PollSchedule, PollStep, Poller};
pub use redshift::RedshiftDataService;
pub use resolver::resolve;

use crate::error::{DispatchError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A result row, keyed by column label.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The cluster a statement runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterRef {
    /// Provisioned cluster identifier.
    Provisioned(String),
    /// Serverless workgroup name.
    Serverless(String),
}

/// How the engine authenticates the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialRef {
    /// Secret holding database credentials.
    Secret(String),
    /// Temporary credentials for a database user.
    DbUser(String),
    /// The caller's own identity (serverless only).
    CallerIdentity,
}

/// Fully resolved execution target, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTarget {
    pub cluster: ClusterRef,
    pub database: String,
    pub credentials: CredentialRef,
    pub with_event: bool,
}

/// Identifier of a submitted statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionHandle {
    pub execution_id: String,
}

impl ExecutionHandle {
    pub fn new(execution_id: impl Into<String>) -> Self {
        Self {
            execution_id: execution_id.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.execution_id
    }
}

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.execution_id)
    }
}

/// Status of a submitted statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Submitted,
    Picked,
    Started,
    Finished,
    Failed,
    Aborted,
}

impl ExecutionStatus {
    /// Returns true once the status can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Aborted)
    }

    /// Returns the engine's name for the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Picked => "PICKED",
            Self::Started => "STARTED",
            Self::Finished => "FINISHED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionStatus {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "SUBMITTED" => Ok(Self::Submitted),
            "PICKED" => Ok(Self::Picked),
            "STARTED" | "RUNNING" => Ok(Self::Started),
            "FINISHED" => Ok(Self::Finished),
            "FAILED" => Ok(Self::Failed),
            "ABORTED" => Ok(Self::Aborted),
            _ => Err(DispatchError::internal(format!(
                "unrecognised statement status '{s}'"
            ))),
        }
    }
}

/// Snapshot returned by a status lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementDescription {
    pub status: ExecutionStatus,
    /// Whether the statement produced a result set (meaningful once FINISHED).
    pub has_result_set: bool,
    /// Diagnostic text attached by the engine, if any.
    pub error: Option<String>,
}

impl StatementDescription {
    pub fn new(status: ExecutionStatus) -> Self {
        Self {
            status,
            has_result_set: false,
            error: None,
        }
    }
}

/// Final outcome of one statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Finished with a result set.
    Rows(Vec<Record>),
    /// Finished without a result set.
    Success,
    /// Reached a terminal status other than FINISHED.
    Failure {
        status: ExecutionStatus,
        detail: Option<String>,
    },
}

/// Remote SQL execution service.
#[async_trait]
pub trait StatementService: Send + Sync {
    /// Submits `sql` for asynchronous execution. Fails with `ExecutionSubmit`.
    async fn submit(&self, sql: &str, target: &ExecutionTarget) -> Result<ExecutionHandle>;

    /// Describes the current state of a statement. Fails with `StatusQuery`.
    async fn describe(&self, handle: &ExecutionHandle) -> Result<StatementDescription>;

    /// Fetches all result rows of a finished statement. Fails with `ResultFetch`.
    async fn fetch_result(&self, handle: &ExecutionHandle) -> Result<Vec<Record>>;
}

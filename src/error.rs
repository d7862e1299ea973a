//! Error types for the dispatcher.
//!
//! Every pipeline step returns one of these variants. Trigger adapters turn
//! them into structured responses, so none of them escapes an invocation.

use std::time::Duration;
use thiserror::Error;

/// Main error type for dispatcher operations.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The inbound event is missing the fields an adapter needs.
    #[error("Could not parse event: {0}")]
    BadEventFormat(String),

    /// A required invocation parameter is absent or empty.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// The catalog holds no usable SQL for the requested name.
    #[error("No query found for '{0}'")]
    NotFound(String),

    /// The catalog store could not be reached or refused the request.
    #[error("Catalog error: {0}")]
    CatalogUnavailable(String),

    /// The execution service rejected the statement.
    #[error("Execution error: {0}")]
    ExecutionSubmit(String),

    /// The statement reached a terminal state other than FINISHED.
    #[error("Query failed: {status} - {}", .detail.as_deref().unwrap_or("None"))]
    ExecutionStatus {
        status: String,
        detail: Option<String>,
    },

    /// A status lookup against the execution service failed.
    #[error("Status error: {0}")]
    StatusQuery(String),

    /// The statement did not reach a terminal state within the poll budget.
    #[error("Query {execution_id} still running after {waited:?}")]
    PollTimeout {
        execution_id: String,
        waited: Duration,
    },

    /// Rows could not be fetched for a statement that reported FINISHED.
    #[error("Result fetch error: {0}")]
    ResultFetch(String),

    /// Configuration errors (missing environment, invalid file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// Creates a bad event format error with the given message.
    pub fn bad_event(msg: impl Into<String>) -> Self {
        Self::BadEventFormat(msg.into())
    }

    /// Creates a missing parameter error with the given message.
    pub fn missing_parameter(msg: impl Into<String>) -> Self {
        Self::MissingParameter(msg.into())
    }

    /// Creates a not-found error for the given query name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Creates a catalog error with the given message.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }

    /// Creates a submission error with the given message.
    pub fn submit(msg: impl Into<String>) -> Self {
        Self::ExecutionSubmit(msg.into())
    }

    /// Creates a status lookup error with the given message.
    pub fn status_query(msg: impl Into<String>) -> Self {
        Self::StatusQuery(msg.into())
    }

    /// Creates a result fetch error with the given message.
    pub fn result_fetch(msg: impl Into<String>) -> Self {
        Self::ResultFetch(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::BadEventFormat(_) => "Bad Event Format",
            Self::MissingParameter(_) => "Missing Parameter",
            Self::NotFound(_) => "Not Found",
            Self::CatalogUnavailable(_) => "Catalog Unavailable",
            Self::ExecutionSubmit(_) => "Execution Submit Error",
            Self::ExecutionStatus { .. } => "Execution Status Error",
            Self::StatusQuery(_) => "Status Query Error",
            Self::PollTimeout { .. } => "Poll Timeout",
            Self::ResultFetch(_) => "Result Fetch Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// HTTP-style status code reported to the caller.
    ///
    /// Client-caused failures map to 4xx, everything downstream to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadEventFormat(_) | Self::MissingParameter(_) => 400,
            Self::NotFound(_) => 404,
            _ => 500,
        }
    }
}

/// Result type alias using DispatchError.
pub type Result<T> = std::result::Result<T, DispatchError>;

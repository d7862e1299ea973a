//! Scripted statement service for testing and local runs.
//!
//! Replays a fixed sequence of statuses, one per status lookup. The last
//! status repeats once the script is exhausted, so a terminal status stays
//! terminal.

use super::{
    ExecutionHandle, ExecutionStatus, ExecutionTarget, Record, StatementDescription,
    StatementService,
};
use crate::error::{DispatchError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A statement service that replays a status script.
#[derive(Debug)]
pub struct ScriptedStatementService {
    execution_id: String,
    script: Mutex<VecDeque<ExecutionStatus>>,
    has_result_set: bool,
    error: Option<String>,
    rows: Vec<Record>,
    submit_error: Option<String>,
    describe_error: Option<String>,
    fetch_error: Option<String>,
    submitted: Mutex<Vec<(String, ExecutionTarget)>>,
    describe_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl ScriptedStatementService {
    /// Creates a service that reports `script` in order.
    pub fn new(script: Vec<ExecutionStatus>) -> Self {
        Self {
            execution_id: "d9b7d7e2-0000-4c1f-9a51-000000000001".to_string(),
            script: Mutex::new(script.into()),
            has_result_set: false,
            error: None,
            rows: Vec::new(),
            submit_error: None,
            describe_error: None,
            fetch_error: None,
            submitted: Mutex::new(Vec::new()),
            describe_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Uses the given identifier for submitted statements.
    pub fn with_execution_id(mut self, id: impl Into<String>) -> Self {
        self.execution_id = id.into();
        self
    }

    /// Marks the statement as producing `rows`.
    pub fn with_rows(mut self, rows: Vec<Record>) -> Self {
        self.has_result_set = true;
        self.rows = rows;
        self
    }

    /// Attaches engine diagnostic text to every description.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Makes submission fail.
    pub fn failing_submit(mut self, message: impl Into<String>) -> Self {
        self.submit_error = Some(message.into());
        self
    }

    /// Makes status lookups fail.
    pub fn failing_describe(mut self, message: impl Into<String>) -> Self {
        self.describe_error = Some(message.into());
        self
    }

    /// Makes result fetches fail.
    pub fn failing_fetch(mut self, message: impl Into<String>) -> Self {
        self.fetch_error = Some(message.into());
        self
    }

    /// SQL text of every submitted statement, in order.
    pub fn submitted_sql(&self) -> Vec<String> {
        self.lock_submitted()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    /// Targets of every submitted statement, in order.
    pub fn submitted_targets(&self) -> Vec<ExecutionTarget> {
        self.lock_submitted()
            .iter()
            .map(|(_, target)| target.clone())
            .collect()
    }

    /// Number of status lookups so far.
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// Number of result fetches so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn lock_submitted(&self) -> std::sync::MutexGuard<'_, Vec<(String, ExecutionTarget)>> {
        self.submitted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_status(&self) -> Result<ExecutionStatus> {
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let status = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().copied()
        };
        status.ok_or_else(|| DispatchError::status_query("no statement status scripted"))
    }

    fn check_handle(&self, handle: &ExecutionHandle) -> Result<()> {
        if handle.as_str() == self.execution_id {
            Ok(())
        } else {
            Err(DispatchError::status_query(format!(
                "Query {} not found",
                handle
            )))
        }
    }
}

#[async_trait]
impl StatementService for ScriptedStatementService {
    async fn submit(&self, sql: &str, target: &ExecutionTarget) -> Result<ExecutionHandle> {
        if let Some(message) = &self.submit_error {
            return Err(DispatchError::submit(message.clone()));
        }
        self.lock_submitted()
            .push((sql.to_string(), target.clone()));
        Ok(ExecutionHandle::new(self.execution_id.clone()))
    }

    async fn describe(&self, handle: &ExecutionHandle) -> Result<StatementDescription> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.describe_error {
            return Err(DispatchError::status_query(message.clone()));
        }
        self.check_handle(handle)?;

        let status = self.next_status()?;
        Ok(StatementDescription {
            status,
            has_result_set: self.has_result_set,
            error: self.error.clone(),
        })
    }

    async fn fetch_result(&self, handle: &ExecutionHandle) -> Result<Vec<Record>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fetch_error {
            return Err(DispatchError::result_fetch(message.clone()));
        }
        self.check_handle(handle)
            .map_err(|e| DispatchError::result_fetch(e.to_string()))?;
        Ok(self.rows.clone())
    }
}

//! Redshift Data API statement service.
//!
//! Statements are submitted with `ExecuteStatement`, tracked with
//! `DescribeStatement`, and read back with `GetStatementResult`.

use super::{
    ClusterRef, CredentialRef, ExecutionHandle, ExecutionStatus, ExecutionTarget, Record,
    StatementDescription, StatementService,
};
use crate::error::{DispatchError, Result};
use async_trait::async_trait;
use aws_sdk_redshiftdata::error::DisplayErrorContext;
use aws_sdk_redshiftdata::types::{ColumnMetadata, Field};
use aws_sdk_redshiftdata::Client;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use tracing::debug;

/// Statement service backed by the Redshift Data API.
#[derive(Debug, Clone)]
pub struct RedshiftDataService {
    client: Client,
}

impl RedshiftDataService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatementService for RedshiftDataService {
    async fn submit(&self, sql: &str, target: &ExecutionTarget) -> Result<ExecutionHandle> {
        if sql.trim().is_empty() {
            return Err(DispatchError::submit("SQL text is empty"));
        }

        let mut request = self
            .client
            .execute_statement()
            .database(&target.database)
            .sql(sql)
            .with_event(target.with_event);

        request = match &target.cluster {
            ClusterRef::Provisioned(id) => request.cluster_identifier(id),
            ClusterRef::Serverless(name) => request.workgroup_name(name),
        };
        request = match &target.credentials {
            CredentialRef::Secret(arn) => request.secret_arn(arn),
            CredentialRef::DbUser(user) => request.db_user(user),
            CredentialRef::CallerIdentity => request,
        };

        let output = request
            .send()
            .await
            .map_err(|e| DispatchError::submit(DisplayErrorContext(&e).to_string()))?;

        let id = output
            .id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DispatchError::submit("ExecuteStatement returned no statement id"))?;

        debug!(execution_id = id, database = %target.database, "ExecuteStatement");
        Ok(ExecutionHandle::new(id))
    }

    async fn describe(&self, handle: &ExecutionHandle) -> Result<StatementDescription> {
        let output = self
            .client
            .describe_statement()
            .id(handle.as_str())
            .send()
            .await
            .map_err(|e| DispatchError::status_query(DisplayErrorContext(&e).to_string()))?;

        let status = output
            .status()
            .ok_or_else(|| DispatchError::status_query("DescribeStatement returned no status"))?
            .as_str()
            .parse::<ExecutionStatus>()?;

        Ok(StatementDescription {
            status,
            has_result_set: output.has_result_set().unwrap_or(false),
            error: output.error().map(str::to_string),
        })
    }

    async fn fetch_result(&self, handle: &ExecutionHandle) -> Result<Vec<Record>> {
        let mut pages = ResultPages::default();
        let mut next_token: Option<String> = None;
        let mut page = 0u32;

        loop {
            page += 1;
            let output = self
                .client
                .get_statement_result()
                .id(handle.as_str())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| DispatchError::result_fetch(DisplayErrorContext(&e).to_string()))?;

            next_token = pages.push(
                output.column_metadata(),
                output.records(),
                output.next_token(),
            );
            debug!(execution_id = %handle, page, rows = pages.records.len(), "GetStatementResult");

            if next_token.is_none() {
                break;
            }
        }

        Ok(pages.records)
    }
}

/// Records accumulated across result pages.
#[derive(Debug, Default)]
struct ResultPages {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl ResultPages {
    /// Appends one page and returns the token for the next one, if any.
    fn push(
        &mut self,
        metadata: &[ColumnMetadata],
        rows: &[Vec<Field>],
        next_token: Option<&str>,
    ) -> Option<String> {
        // Column metadata is only guaranteed on the first page.
        if self.columns.is_empty() {
            self.columns = column_labels(metadata);
        }
        self.records
            .extend(rows.iter().map(|row| to_record(&self.columns, row)));

        next_token
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }
}

/// Column labels in result order, falling back to the column name, then to
/// a positional name.
fn column_labels(metadata: &[ColumnMetadata]) -> Vec<String> {
    metadata
        .iter()
        .enumerate()
        .map(|(i, column)| {
            column
                .label()
                .or(column.name())
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("column_{}", i + 1))
        })
        .collect()
}

/// Builds a JSON record from one result row.
fn to_record(columns: &[String], row: &[Field]) -> Record {
    row.iter()
        .enumerate()
        .map(|(i, field)| {
            let key = columns
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("column_{}", i + 1));
            (key, field_value(field))
        })
        .collect()
}

/// Converts one typed field into JSON. Blobs become base64 strings.
fn field_value(field: &Field) -> Value {
    match field {
        Field::StringValue(s) => Value::String(s.clone()),
        Field::LongValue(n) => Value::from(*n),
        Field::DoubleValue(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Field::BooleanValue(b) => Value::Bool(*b),
        Field::IsNull(_) => Value::Null,
        Field::BlobValue(blob) => Value::String(BASE64.encode(blob.as_ref())),
        _ => Value::Null,
    }
}

//! DynamoDB-backed query catalog.
//!
//! Each saved query is one item keyed by its name, with the SQL text in a
//! string attribute.

use super::{QueryCatalog, QueryName, QueryRecord};
use crate::config::CatalogConfig;
use crate::error::{DispatchError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use tracing::debug;

/// Query catalog reading from a DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoCatalog {
    client: Client,
    table: String,
    key_attribute: String,
    sql_attribute: String,
}

impl DynamoCatalog {
    /// Creates a catalog over `table` using the configured attribute names.
    pub fn new(client: Client, table: impl Into<String>, config: &CatalogConfig) -> Self {
        Self {
            client,
            table: table.into(),
            key_attribute: config.key_attribute.clone(),
            sql_attribute: config.sql_attribute.clone(),
        }
    }
}

#[async_trait]
impl QueryCatalog for DynamoCatalog {
    async fn lookup(&self, name: &QueryName) -> Result<QueryRecord> {
        debug!(table = %self.table, query_name = %name, "GetItem");

        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(
                &self.key_attribute,
                AttributeValue::S(name.as_str().to_string()),
            )
            .consistent_read(false)
            .projection_expression("#sql")
            .expression_attribute_names("#sql", &self.sql_attribute)
            .send()
            .await
            .map_err(|e| {
                DispatchError::catalog(format!("DynamoDB error: {}", DisplayErrorContext(&e)))
            })?;

        let sql = sql_from_item(output.item(), &self.sql_attribute, name)?;

        Ok(QueryRecord {
            query_name: name.clone(),
            sql,
        })
    }
}

/// Extracts non-blank SQL text from a catalog item.
fn sql_from_item(
    item: Option<&HashMap<String, AttributeValue>>,
    sql_attribute: &str,
    name: &QueryName,
) -> Result<String> {
    match item.and_then(|item| item.get(sql_attribute)) {
        Some(AttributeValue::S(sql)) if !sql.trim().is_empty() => Ok(sql.clone()),
        _ => Err(DispatchError::not_found(name.as_str())),
    }
}

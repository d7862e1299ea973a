//! In-memory catalogs for testing and local runs.

use super::{QueryCatalog, QueryName, QueryRecord};
use crate::error::{DispatchError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// A catalog backed by a map of query name to SQL.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    queries: HashMap<String, String>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a query to the catalog.
    pub fn with_query(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.queries.insert(name.into(), sql.into());
        self
    }
}

#[async_trait]
impl QueryCatalog for InMemoryCatalog {
    async fn lookup(&self, name: &QueryName) -> Result<QueryRecord> {
        match self.queries.get(name.as_str()) {
            Some(sql) if !sql.trim().is_empty() => Ok(QueryRecord {
                query_name: name.clone(),
                sql: sql.clone(),
            }),
            _ => Err(DispatchError::not_found(name.as_str())),
        }
    }
}

/// A catalog whose store is always unreachable.
#[derive(Debug, Clone)]
pub struct FailingCatalog {
    message: String,
}

impl FailingCatalog {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl QueryCatalog for FailingCatalog {
    async fn lookup(&self, _name: &QueryName) -> Result<QueryRecord> {
        Err(DispatchError::catalog(self.message.clone()))
    }
}

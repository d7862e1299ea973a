//! Query catalog: maps a query name to the SQL stored for it.
//!
//! The catalog is read-only from the dispatcher's point of view. Records
//! are created and edited by whoever owns the backing table.

mod dynamo;
mod mock;

pub use dynamo::DynamoCatalog;
pub use mock::{FailingCatalog, InMemoryCatalog};

use crate::error::{DispatchError, Result};
use async_trait::async_trait;
use std::fmt;

/// Logical name of a saved query. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryName(String);

impl QueryName {
    /// Creates a query name, rejecting empty or whitespace-only input.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DispatchError::missing_parameter(
                "query_name must not be empty",
            ));
        }
        Ok(Self(name))
    }

    /// Derives a query name from a storage object key.
    ///
    /// Keys arrive form-encoded (`+` for spaces). The name is the final path
    /// segment with `suffix` removed when, and only when, it ends the segment:
    /// `orders/load_orders.csv` gives `load_orders`, `a/b/c.report.csv`
    /// gives `c.report`. Folders are not part of the name.
    pub fn from_object_key(key: &str, suffix: &str) -> Result<Self> {
        let unplussed = key.replace('+', " ");
        let decoded = urlencoding::decode(&unplussed)
            .map_err(|e| DispatchError::bad_event(format!("invalid object key '{key}': {e}")))?;

        let file_name = decoded.rsplit('/').next().unwrap_or_default();
        let stem = file_name.strip_suffix(suffix).unwrap_or(file_name);

        Self::new(stem).map_err(|_| {
            DispatchError::bad_event(format!("object key '{key}' does not name a query"))
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A saved query as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub query_name: QueryName,
    pub sql: String,
}

/// Read access to the query catalog.
#[async_trait]
pub trait QueryCatalog: Send + Sync {
    /// Looks up the SQL stored under `name`.
    ///
    /// Returns `NotFound` when the record or its SQL is missing and
    /// `CatalogUnavailable` when the store itself fails.
    async fn lookup(&self, name: &QueryName) -> Result<QueryRecord>;
}

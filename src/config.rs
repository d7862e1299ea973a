//! Configuration management for the dispatcher.
//!
//! Configuration is resolved once at process start: defaults, then an
//! optional TOML file, then environment variables. Handlers receive the
//! resolved values and never read the environment themselves.

use crate::error::{DispatchError, Result};
use crate::execution::{ClusterRef, CredentialRef, ExecutionTarget, PollPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query catalog table settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where statements are executed.
    #[serde(default)]
    pub target: TargetConfig,

    /// Status polling behaviour.
    #[serde(default)]
    pub poll: PollConfig,

    /// Storage event handling.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Query catalog table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Table holding one item per saved query.
    pub table: Option<String>,

    /// Partition key attribute holding the query name.
    #[serde(default = "default_key_attribute")]
    pub key_attribute: String,

    /// String attribute holding the SQL text.
    #[serde(default = "default_sql_attribute")]
    pub sql_attribute: String,
}

fn default_key_attribute() -> String {
    "query_name".to_string()
}

fn default_sql_attribute() -> String {
    "sql".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            table: None,
            key_attribute: default_key_attribute(),
            sql_attribute: default_sql_attribute(),
        }
    }
}

/// Execution target settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Provisioned cluster identifier.
    pub cluster_id: Option<String>,

    /// Serverless workgroup name.
    pub workgroup_name: Option<String>,

    /// Database name.
    pub database: Option<String>,

    /// Secret holding database credentials.
    pub secret_arn: Option<String>,

    /// Database user for temporary credentials (provisioned clusters only).
    pub db_user: Option<String>,

    /// Ask the engine to publish a completion event.
    #[serde(default = "default_with_event")]
    pub with_event: bool,
}

fn default_with_event() -> bool {
    true
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            cluster_id: None,
            workgroup_name: None,
            database: None,
            secret_arn: None,
            db_user: None,
            with_event: default_with_event(),
        }
    }
}

/// Status polling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// First delay between status checks, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Upper bound for the delay between status checks, in milliseconds.
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,

    /// Multiplier applied to the delay after each pending status.
    #[serde(default = "default_backoff")]
    pub backoff: f64,

    /// Give up waiting after this many seconds.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_max_interval_ms() -> u64 {
    5000
}

fn default_backoff() -> f64 {
    1.5
}

// Function runtimes cap invocations at 15 minutes.
fn default_max_wait_secs() -> u64 {
    840
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            backoff: default_backoff(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

impl PollConfig {
    /// Converts the settings into a validated poll policy.
    pub fn policy(&self) -> Result<PollPolicy> {
        if self.interval_ms == 0 {
            return Err(DispatchError::config("poll interval must be positive"));
        }
        if self.max_interval_ms < self.interval_ms {
            return Err(DispatchError::config(
                "poll max interval must not be below the poll interval",
            ));
        }
        if !self.backoff.is_finite() || self.backoff < 1.0 {
            return Err(DispatchError::config("poll backoff must be at least 1.0"));
        }
        if self.max_wait_secs == 0 {
            return Err(DispatchError::config("poll max wait must be positive"));
        }

        Ok(PollPolicy {
            interval: Duration::from_millis(self.interval_ms),
            max_interval: Duration::from_millis(self.max_interval_ms),
            backoff: self.backoff,
            max_wait: Duration::from_secs(self.max_wait_secs),
        })
    }
}

/// Storage event settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Suffix removed from the object name to obtain the query name.
    #[serde(default = "default_object_suffix")]
    pub object_suffix: String,
}

fn default_object_suffix() -> String {
    ".csv".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            object_suffix: default_object_suffix(),
        }
    }
}

impl Config {
    /// Loads configuration from an optional TOML file, then applies the
    /// process environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DispatchError::config(format!("Failed to read {}: {e}", path.display()))
        })?;

        toml::from_str(&content).map_err(|e| {
            DispatchError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies environment variables, which take precedence over file values.
    ///
    /// `lookup` abstracts the environment so tests do not mutate process state.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("DDB_TABLE") {
            self.catalog.table = Some(v);
        }
        if let Some(v) = var("QUERY_KEY_ATTRIBUTE") {
            self.catalog.key_attribute = v;
        }
        if let Some(v) = var("SQL_ATTRIBUTE") {
            self.catalog.sql_attribute = v;
        }
        if let Some(v) = var("CLUSTER_ID") {
            self.target.cluster_id = Some(v);
        }
        if let Some(v) = var("WORKGROUP_NAME") {
            self.target.workgroup_name = Some(v);
        }
        if let Some(v) = var("DATABASE") {
            self.target.database = Some(v);
        }
        if let Some(v) = var("SECRET_ARN") {
            self.target.secret_arn = Some(v);
        }
        if let Some(v) = var("DB_USER") {
            self.target.db_user = Some(v);
        }
        if let Some(v) = var("WITH_EVENT") {
            self.target.with_event = parse_env("WITH_EVENT", &v)?;
        }
        if let Some(v) = var("POLL_INTERVAL_MS") {
            self.poll.interval_ms = parse_env("POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = var("POLL_MAX_INTERVAL_MS") {
            self.poll.max_interval_ms = parse_env("POLL_MAX_INTERVAL_MS", &v)?;
        }
        if let Some(v) = var("POLL_BACKOFF") {
            self.poll.backoff = parse_env("POLL_BACKOFF", &v)?;
        }
        if let Some(v) = var("POLL_MAX_WAIT_SECS") {
            self.poll.max_wait_secs = parse_env("POLL_MAX_WAIT_SECS", &v)?;
        }
        if let Some(v) = var("OBJECT_SUFFIX") {
            self.storage.object_suffix = v;
        }

        Ok(())
    }

    /// Returns the catalog table name.
    pub fn catalog_table(&self) -> Result<&str> {
        self.catalog
            .table
            .as_deref()
            .ok_or_else(|| DispatchError::config("DDB_TABLE is not set"))
    }

    /// Resolves the execution target, validating that exactly one cluster
    /// reference and a usable credential reference are present.
    pub fn execution_target(&self) -> Result<ExecutionTarget> {
        let t = &self.target;

        let cluster = match (&t.cluster_id, &t.workgroup_name) {
            (Some(id), None) => ClusterRef::Provisioned(id.clone()),
            (None, Some(name)) => ClusterRef::Serverless(name.clone()),
            (Some(_), Some(_)) => {
                return Err(DispatchError::config(
                    "CLUSTER_ID and WORKGROUP_NAME are mutually exclusive",
                ))
            }
            (None, None) => {
                return Err(DispatchError::config(
                    "one of CLUSTER_ID or WORKGROUP_NAME must be set",
                ))
            }
        };

        let database = t
            .database
            .clone()
            .ok_or_else(|| DispatchError::config("DATABASE is not set"))?;

        let credentials = match (&t.secret_arn, &t.db_user, &cluster) {
            (Some(arn), _, _) => CredentialRef::Secret(arn.clone()),
            (None, Some(user), ClusterRef::Provisioned(_)) => CredentialRef::DbUser(user.clone()),
            (None, Some(_), ClusterRef::Serverless(_)) => {
                return Err(DispatchError::config(
                    "DB_USER is only supported for provisioned clusters",
                ))
            }
            (None, None, ClusterRef::Serverless(_)) => CredentialRef::CallerIdentity,
            (None, None, ClusterRef::Provisioned(_)) => {
                return Err(DispatchError::config(
                    "SECRET_ARN or DB_USER is required for a provisioned cluster",
                ))
            }
        };

        Ok(ExecutionTarget {
            cluster,
            database,
            credentials,
            with_event: t.with_event,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DispatchError::config(format!("{key} has an invalid value: '{value}'")))
}

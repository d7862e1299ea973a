//! Builds the trigger adapter for this process.
//!
//! Service handles are created once at startup and injected into the
//! adapter; invocations share them but hold no other state.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use tracing::info;

use crate::catalog::{DynamoCatalog, QueryCatalog};
use crate::config::Config;
use crate::error::Result;
use crate::execution::{RedshiftDataService, StatementService};
use crate::pipeline::QueryPipeline;
use crate::trigger::{
    DirectInvokeAdapter, StatusCheckAdapter, StorageEventAdapter, TriggerAdapter, TriggerKind,
};

/// Creates the adapter for `kind` backed by DynamoDB and the Redshift Data
/// API, using the default credential chain and region.
pub async fn connect(kind: TriggerKind, config: &Config) -> Result<Arc<dyn TriggerAdapter>> {
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let statements: Arc<dyn StatementService> = Arc::new(RedshiftDataService::new(
        aws_sdk_redshiftdata::Client::new(&sdk_config),
    ));

    // Status checks never touch the catalog, so they need no table.
    if kind == TriggerKind::Status {
        info!(trigger = %kind, "adapter ready");
        return Ok(Arc::new(StatusCheckAdapter::new(statements)));
    }

    let catalog: Arc<dyn QueryCatalog> = Arc::new(DynamoCatalog::new(
        aws_sdk_dynamodb::Client::new(&sdk_config),
        config.catalog_table()?,
        &config.catalog,
    ));

    build_adapter(kind, config, catalog, statements)
}

/// Creates the adapter for `kind` over the given service handles.
pub fn build_adapter(
    kind: TriggerKind,
    config: &Config,
    catalog: Arc<dyn QueryCatalog>,
    statements: Arc<dyn StatementService>,
) -> Result<Arc<dyn TriggerAdapter>> {
    let adapter: Arc<dyn TriggerAdapter> = match kind {
        TriggerKind::Status => Arc::new(StatusCheckAdapter::new(statements)),
        TriggerKind::StorageEvent | TriggerKind::Direct => {
            let target = config.execution_target()?;
            let policy = config.poll.policy()?;
            info!(
                cluster = ?target.cluster,
                database = %target.database,
                max_wait = ?policy.max_wait,
                "execution target resolved"
            );

            let pipeline = QueryPipeline::new(catalog, statements, target, policy);
            if kind == TriggerKind::StorageEvent {
                Arc::new(StorageEventAdapter::new(
                    pipeline,
                    config.storage.object_suffix.clone(),
                ))
            } else {
                Arc::new(DirectInvokeAdapter::new(pipeline))
            }
        }
    };

    info!(trigger = %kind, "adapter ready");
    Ok(adapter)
}

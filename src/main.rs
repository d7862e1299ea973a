//! query-dispatch - runs saved SQL statements in response to events.

mod cli;

use std::sync::Arc;

use anyhow::Context;
use cli::{Cli, Command};
use lambda_runtime::{service_fn, LambdaEvent};
use query_dispatch::config::Config;
use query_dispatch::trigger::{Response, TriggerAdapter};
use query_dispatch::{app, logging};
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};

#[tokio::main]
async fn main() {
    // Local runs may keep settings in a .env file
    let _ = dotenvy::dotenv();
    logging::init_logging();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let trigger = cli.trigger()?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let adapter = app::connect(trigger, &config)
        .await
        .with_context(|| format!("Failed to set up the {trigger} adapter"))?;

    match cli.command() {
        Command::Serve => serve(adapter).await,
        Command::Invoke { event, pretty } => {
            let event = cli::read_event(&event)?;
            let response = adapter.handle(event).await;
            let output = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{output}");
            Ok(())
        }
    }
}

/// Serves invocations from the function runtime until it shuts down.
async fn serve(adapter: Arc<dyn TriggerAdapter>) -> anyhow::Result<()> {
    info!("waiting for invocations");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let adapter = adapter.clone();
        async move {
            let (payload, context) = event.into_parts();
            let span = info_span!("invocation", request_id = %context.request_id);
            let response = adapter.handle(payload).instrument(span).await;
            Ok::<Response, lambda_runtime::Error>(response)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}

//! Command-line argument parsing.
//!
//! With no subcommand the binary serves function invocations, which is how
//! the runtime starts it.

use clap::{Parser, Subcommand};
use query_dispatch::error::{DispatchError, Result};
use query_dispatch::trigger::TriggerKind;
use std::io::Read;
use std::path::PathBuf;

/// Runs saved SQL statements in response to events.
#[derive(Parser, Debug)]
#[command(name = "query-dispatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Which adapter handles incoming events
    #[arg(long, value_enum, env = "DISPATCH_TRIGGER", global = true)]
    pub trigger: Option<TriggerKind>,

    /// Config file path (TOML); environment variables take precedence
    #[arg(long, value_name = "PATH", env = "DISPATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve invocations from the function runtime (default)
    Serve,

    /// Handle a single event locally and print the response
    Invoke {
        /// Path to the JSON event ("-" for stdin)
        #[arg(long, value_name = "PATH", default_value = "-")]
        event: String,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the selected adapter.
    pub fn trigger(&self) -> Result<TriggerKind> {
        self.trigger.ok_or_else(|| {
            DispatchError::config("no trigger selected; pass --trigger or set DISPATCH_TRIGGER")
        })
    }

    /// Returns the subcommand, defaulting to `serve`.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

/// Reads a JSON event from a file, or from stdin when `path` is "-".
pub fn read_event(path: &str) -> Result<serde_json::Value> {
    let content = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| DispatchError::config(format!("Failed to read event from stdin: {e}")))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| DispatchError::config(format!("Failed to read event {path}: {e}")))?
    };

    serde_json::from_str(&content)
        .map_err(|e| DispatchError::config(format!("Event is not valid JSON: {e}")))
}

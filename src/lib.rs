//! query-dispatch - runs saved SQL statements in response to events.
//!
//! A trigger adapter turns an inbound event into a query name, the catalog
//! maps the name to SQL, and the execution service runs it. The poller waits
//! for a terminal status and the resolver returns rows or a failure.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod pipeline;
pub mod trigger;

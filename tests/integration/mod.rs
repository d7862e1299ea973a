//! End-to-end adapter and binary tests.

pub mod cli_test;
pub mod common;
pub mod direct_invoke_test;
pub mod status_check_test;
pub mod storage_event_test;

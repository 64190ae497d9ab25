//! Git Ping dashboard library: re-exports internal modules for integration testing.
//!
//! Integration tests in `tests/` cannot access items from a binary crate.
//! This `lib.rs` creates a library target alongside the binary so that
//! `tests/polling.rs` can drive `gitping::controller::PollingController`
//! against a mock server.

pub mod api;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod events;
pub mod interrupt;
pub mod output;
pub mod run_loop;
pub mod sample;
pub mod status;
pub mod store;
pub mod time_format;
pub mod ui;

//! `TaskDeck` API server library.
//!
//! Exposes the task API server for use in tests and embedding. The server
//! holds tasks in memory and implements the REST contract the `taskdeck`
//! client consumes.

pub mod api;
pub mod config;
pub mod store;

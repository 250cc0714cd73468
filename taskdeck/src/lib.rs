//! `TaskDeck` terminal to-do client library.

pub mod app;
pub mod config;
pub mod monitor;
pub mod notify;
pub mod store;
pub mod sync;
pub mod ui;

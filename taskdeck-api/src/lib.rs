//! Shared task model and remote API wire types for `TaskDeck`.

pub mod task;
pub mod wire;

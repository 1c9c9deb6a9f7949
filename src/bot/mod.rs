//! Chat command layer on top of the engine.
//!
//! Command parsing and batch planning are platform independent; the Telegram
//! adapter lives behind the `telegram` feature.

pub mod commands;
pub mod delivery;
#[cfg(feature = "telegram")]
pub mod telegram;

pub use commands::Command;
pub use delivery::{plan, Batch, LinkButton};

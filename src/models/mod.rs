//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use anonproxies::models::{Protocol, ProxyResult};
//!
//! let mut result = ProxyResult::new();
//! result.push(Protocol::Vless, "vless://a");
//! assert_eq!(result.get(Protocol::Vless), ["vless://a"]);
//! ```

mod protocol;
mod result;
mod source;

pub use protocol::Protocol;
pub use result::ProxyResult;
pub use source::{Source, SourceRegistry};

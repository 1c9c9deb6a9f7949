pub mod bot;
pub mod engine;
pub mod error;
pub mod models;
pub mod settings;
pub mod utils;

// Re-export the main types for easier access
pub use engine::{EngineConfig, ProxyEngine};
pub use error::{Error, Result, Severity};
pub use models::{Protocol, ProxyResult, Source, SourceRegistry};
pub use settings::Settings;

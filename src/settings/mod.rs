//! Settings module
//!
//! Settings are read once by the binary and handed to the engine and the
//! bot layer explicitly.

pub mod config;

pub use config::{
    DeliverySettings, EndpointSettings, HttpSettings, PathSettings, Settings, TelegramSettings,
    ThreadSettings, DEFAULT_SETTINGS_FILE, TOKEN_ENV,
};

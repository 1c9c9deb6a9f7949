pub mod base64;
pub mod file;
pub mod http;
pub mod system;

// Re-export common utilities
pub use http::{Fetch, HttpFetcher};
pub use system::humanize_age;

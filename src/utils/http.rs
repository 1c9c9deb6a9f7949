use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Proxy;

use crate::error::{Error, Result};
use crate::utils::system::get_system_proxy;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 15;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "anonproxies";

/// Something that can turn a URL into a text body.
///
/// The engine only talks to the network through this trait, which keeps it
/// testable without sockets.
pub trait Fetch {
    fn get_text(&self, url: &str) -> Result<String>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get_text(&self, url: &str) -> Result<String> {
        (**self).get_text(url)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    pub proxy: Option<String>,
}

/// Resolve an outbound proxy setting.
///
/// `SYSTEM` reads the proxy from the environment, `NONE` or an empty string
/// disables it, anything else is used as the proxy URL.
pub fn parse_proxy(proxy_str: &str) -> ProxyConfig {
    match proxy_str {
        "SYSTEM" => {
            let system = get_system_proxy();
            ProxyConfig {
                proxy: (!system.is_empty()).then_some(system),
            }
        }
        "NONE" | "" => ProxyConfig { proxy: None },
        other => ProxyConfig {
            proxy: Some(other.to_string()),
        },
    }
}

/// Blocking HTTP transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given timeout, user agent and outbound proxy.
    pub fn new(timeout: Duration, user_agent: &str, proxy_config: &ProxyConfig) -> Result<Self> {
        let mut client_builder = Client::builder().timeout(timeout).user_agent(user_agent);

        if let Some(proxy) = &proxy_config.proxy {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Failed to set proxy: {}", e)))?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpFetcher { client })
    }
}

impl Fetch for HttpFetcher {
    /// Makes a GET request and returns the body as text.
    ///
    /// Non-success status codes are reported as errors.
    fn get_text(&self, url: &str) -> Result<String> {
        let fetch_err = |reason: String| Error::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_err(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP error: {}", status)));
        }

        response
            .text()
            .map_err(|e| fetch_err(format!("Failed to read response body: {}", e)))
    }
}

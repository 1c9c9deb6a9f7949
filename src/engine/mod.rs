//! Proxy aggregation engine
//!
//! Refresh pulls every registered source into the flat cache file; the query
//! operations read that cache (or one of the two live endpoints) and return
//! per-protocol entries. All I/O is blocking and strictly sequential.
//!
//! Refresh and query share the cache file without any locking, so callers
//! must not run them concurrently against the same deployment.

pub mod parser;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use log::{debug, error, info};

use crate::error::{Error, Result};
use crate::models::{Protocol, ProxyResult, SourceRegistry};
use crate::utils::base64::base64_decode_strict;
use crate::utils::file::{file_exists, file_get, file_modified, file_write};
use crate::utils::http::Fetch;

pub use parser::{extract_uri_entries, parse_mtproto_list, parse_socks5_list};

/// Locations the engine works with, injected by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub cache_path: PathBuf,
    pub sources_path: PathBuf,
    pub socks5_url: String,
    pub mtproto_url: String,
}

pub struct ProxyEngine<F> {
    config: EngineConfig,
    fetcher: F,
}

impl<F: Fetch> ProxyEngine<F> {
    pub fn new(config: EngineConfig, fetcher: F) -> Self {
        ProxyEngine { config, fetcher }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read the services file. A missing or unreadable list is fatal.
    pub fn load_sources(&self) -> Result<SourceRegistry> {
        let path = &self.config.sources_path;
        if !file_exists(path) {
            return Err(Error::SourceListMissing(path.display().to_string()));
        }

        let content = file_get(path).map_err(|e| Error::SourceList {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        SourceRegistry::from_json(&content).map_err(|e| Error::SourceList {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Fetch every registered source and concatenate the bodies in order.
    ///
    /// Base64 sources are decoded first. Nothing is written.
    pub fn collect(&self, registry: &SourceRegistry) -> Result<String> {
        let mut buffer = String::new();

        for source in registry {
            info!("Getting sources -> {}", source.label());
            let body = self.fetcher.get_text(&source.url)?;

            if source.is_base64 {
                let decoded = base64_decode_strict(&body).map_err(|reason| Error::Base64 {
                    url: source.url.clone(),
                    reason,
                })?;
                buffer.push_str(&decoded);
            } else {
                buffer.push_str(&body);
            }
        }

        Ok(buffer)
    }

    /// Re-fetch all base sources and overwrite the cache.
    ///
    /// Returns `Ok(true)` when the cache was replaced and `Ok(false)` when a
    /// fetch or the write failed; the failure is logged and the previous
    /// cache is left in place. A missing source list or a source that is not
    /// valid base64 is returned as a fatal error.
    pub fn refresh(&self) -> Result<bool> {
        let registry = self.load_sources()?;

        let buffer = match self.collect(&registry) {
            Ok(buffer) => buffer,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("Issue in fetching proxies: {}", e);
                return Ok(false);
            }
        };

        let path = &self.config.cache_path;
        if let Err(source) = file_write(path, &buffer) {
            let e = Error::CacheWrite {
                path: path.display().to_string(),
                source,
            };
            error!("Issue in fetching proxies: {}", e);
            return Ok(false);
        }

        info!(
            "Result saved in {} successfully ({} sources, {} bytes)",
            path.display(),
            registry.len(),
            buffer.len()
        );
        Ok(true)
    }

    /// Load the whole cache. A missing or unreadable cache is fatal.
    pub fn load_cache(&self) -> Result<String> {
        let path = &self.config.cache_path;
        if !file_exists(path) {
            return Err(Error::CacheMissing(path.display().to_string()));
        }

        file_get(path).map_err(|source| Error::CacheRead {
            path: path.display().to_string(),
            source,
        })
    }

    /// Append the cached vless/vmess/trojan/shadowsocks entries to `result`.
    ///
    /// Calling this twice on the same mapping duplicates every entry.
    pub fn parse_cached(&self, result: &mut ProxyResult) -> Result<()> {
        let content = self.load_cache()?;
        extract_uri_entries(&content, result);
        debug!(
            "Parsed cache: {} vless, {} vmess, {} trojan, {} shadowsocks",
            result.len(Protocol::Vless),
            result.len(Protocol::Vmess),
            result.len(Protocol::Trojan),
            result.len(Protocol::Shadowsocks)
        );
        Ok(())
    }

    /// Replace the `socks5` entry of `result` from the live endpoint.
    pub fn fetch_socks5(&self, result: &mut ProxyResult) -> Result<()> {
        let body = self.fetcher.get_text(&self.config.socks5_url)?;
        result.set(Protocol::Socks5, parse_socks5_list(&body));
        Ok(())
    }

    /// Replace the `mtproto` entry of `result` from the live endpoint.
    pub fn fetch_mtproto(&self, result: &mut ProxyResult) -> Result<()> {
        let url = &self.config.mtproto_url;
        let body = self.fetcher.get_text(url)?;
        let entries = parse_mtproto_list(&body).map_err(|e| Error::Malformed {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        result.set(Protocol::Mtproto, entries);
        Ok(())
    }

    /// Cached URI protocols keyed by protocol name, from a fresh mapping.
    pub fn query_uri_protocols(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut result = ProxyResult::new();
        self.parse_cached(&mut result)?;

        let mut named = result.into_named();
        named.retain(|name, _| {
            name.parse::<Protocol>()
                .map(|p| !p.is_live())
                .unwrap_or(false)
        });
        Ok(named)
    }

    pub fn query_socks5(&self) -> Result<Vec<String>> {
        let mut result = ProxyResult::new();
        self.fetch_socks5(&mut result)?;
        Ok(result.take(Protocol::Socks5))
    }

    pub fn query_mtproto(&self) -> Result<Vec<String>> {
        let mut result = ProxyResult::new();
        self.fetch_mtproto(&mut result)?;
        Ok(result.take(Protocol::Mtproto))
    }

    /// Entries of a single protocol, from the cache or its live endpoint.
    pub fn query(&self, protocol: Protocol) -> Result<Vec<String>> {
        let mut result = ProxyResult::new();
        match protocol {
            Protocol::Socks5 => self.fetch_socks5(&mut result)?,
            Protocol::Mtproto => self.fetch_mtproto(&mut result)?,
            _ => self.parse_cached(&mut result)?,
        }
        Ok(result.take(protocol))
    }

    /// When the cache was last written.
    pub fn last_update(&self) -> Result<SystemTime> {
        let path = &self.config.cache_path;
        file_modified(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::CacheMissing(path.display().to_string())
            } else {
                Error::CacheRead {
                    path: path.display().to_string(),
                    source,
                }
            }
        })
    }

    /// Time since the cache was last written; zero if the clock went backwards.
    pub fn cache_age(&self) -> Result<Duration> {
        let modified = self.last_update()?;
        Ok(SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default())
    }
}

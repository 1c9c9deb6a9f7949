use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::models::Protocol;
use crate::utils::file::{file_exists, file_get};
use crate::utils::http::{parse_proxy, HttpFetcher, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::utils::system::get_env;

/// Settings file looked up when none is given on the command line
pub const DEFAULT_SETTINGS_FILE: &str = "anonproxies.toml";

/// Environment variable that overrides `telegram.token`
pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

fn default_cache_path() -> PathBuf {
    PathBuf::from("data/data.txt")
}

fn default_sources_path() -> PathBuf {
    PathBuf::from("data/services.json")
}

fn default_socks5_url() -> String {
    "https://raw.githubusercontent.com/hookzof/socks5_list/master/proxy.txt".to_string()
}

fn default_mtproto_url() -> String {
    "https://raw.githubusercontent.com/hookzof/socks5_list/master/tg/mtproto.json".to_string()
}

fn default_none() -> String {
    "NONE".to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_limit() -> usize {
    100
}

fn default_uri_batch() -> usize {
    5
}

fn default_link_batch() -> usize {
    10
}

fn default_pace_millis() -> u64 {
    1000
}

fn default_info_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Flat text cache written by refresh and read by every query
    pub cache: PathBuf,
    /// JSON list of base sources
    pub sources: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        PathSettings {
            cache: default_cache_path(),
            sources: default_sources_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    pub socks5: String,
    pub mtproto: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        EndpointSettings {
            socks5: default_socks5_url(),
            mtproto: default_mtproto_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// `NONE`, `SYSTEM` or a proxy URL
    pub proxy: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        HttpSettings {
            proxy: default_none(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Forum thread ids inside the topic chat, one per protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadSettings {
    pub vless: i32,
    pub vmess: i32,
    pub trojan: i32,
    pub shadowsocks: i32,
    pub socks5: i32,
    pub mtproto: i32,
}

impl ThreadSettings {
    pub fn thread_for(&self, protocol: Protocol) -> i32 {
        match protocol {
            Protocol::Vless => self.vless,
            Protocol::Vmess => self.vmess,
            Protocol::Trojan => self.trojan,
            Protocol::Shadowsocks => self.shadowsocks,
            Protocol::Socks5 => self.socks5,
            Protocol::Mtproto => self.mtproto,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub token: String,
    /// Private chat of the operator
    pub admin: i64,
    /// Forum group that receives the proxy batches
    pub topic: i64,
    pub threads: ThreadSettings,
}

impl TelegramSettings {
    /// Commands are only honoured from the admin chat or the topic group.
    pub fn is_authorized(&self, chat_id: i64) -> bool {
        chat_id == self.admin || chat_id == self.topic
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliverySettings {
    /// Maximum entries delivered per command
    pub limit: usize,
    /// Entries per message for vless/vmess/trojan/shadowsocks
    pub uri_batch: usize,
    /// Entries per message for socks5/mtproto
    pub link_batch: usize,
    /// Pause between two messages
    pub pace_millis: u64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        DeliverySettings {
            limit: default_limit(),
            uri_batch: default_uri_batch(),
            link_batch: default_link_batch(),
            pace_millis: default_pace_millis(),
        }
    }
}

impl DeliverySettings {
    pub fn batch_size(&self, protocol: Protocol) -> usize {
        let size = if protocol.has_link_buttons() {
            self.link_batch
        } else {
            self.uri_batch
        };
        size.max(1)
    }

    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub paths: PathSettings,
    pub endpoints: EndpointSettings,
    pub http: HttpSettings,
    pub telegram: TelegramSettings,
    pub delivery: DeliverySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log_level: default_info_log_level(),
            paths: PathSettings::default(),
            endpoints: EndpointSettings::default(),
            http: HttpSettings::default(),
            telegram: TelegramSettings::default(),
            delivery: DeliverySettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML content; absent keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load settings from a file.
    ///
    /// With `None` the default file is tried and built-in defaults are used
    /// when it does not exist. A path given explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };

        let mut settings = if file_exists(&path) {
            let content = file_get(&path)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
            info!("Loading settings from {}", path.display());
            Settings::from_toml(&content)?
        } else if explicit {
            return Err(Error::Config(format!(
                "settings file {} not found",
                path.display()
            )));
        } else {
            debug!("No {} found, using built-in defaults", path.display());
            Settings::default()
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    pub fn apply_env_overrides(&mut self) {
        let token = get_env(TOKEN_ENV);
        if !token.is_empty() {
            self.telegram.token = token;
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cache_path: self.paths.cache.clone(),
            sources_path: self.paths.sources.clone(),
            socks5_url: self.endpoints.socks5.clone(),
            mtproto_url: self.endpoints.mtproto.clone(),
        }
    }

    /// HTTP transport configured from the `[http]` section.
    pub fn fetcher(&self) -> Result<HttpFetcher> {
        HttpFetcher::new(
            Duration::from_secs(self.http.timeout_secs),
            &self.http.user_agent,
            &parse_proxy(&self.http.proxy),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.paths.cache, PathBuf::from("data/data.txt"));
        assert_eq!(settings.paths.sources, PathBuf::from("data/services.json"));
        assert_eq!(settings.delivery.limit, 100);
        assert_eq!(settings.delivery.batch_size(Protocol::Vless), 5);
        assert_eq!(settings.delivery.batch_size(Protocol::Mtproto), 10);
        assert_eq!(settings.http.proxy, "NONE");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml(
            r#"
log_level = "debug"

[paths]
cache = "/var/lib/anonproxies/data.txt"

[telegram]
token = "123:abc"
admin = 42
topic = -1001234

[telegram.threads]
vless = 2
mtproto = 7

[delivery]
uri_batch = 3
"#,
        )
        .unwrap();

        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.paths.cache, PathBuf::from("/var/lib/anonproxies/data.txt"));
        assert_eq!(settings.paths.sources, PathBuf::from("data/services.json"));
        assert_eq!(settings.telegram.threads.thread_for(Protocol::Vless), 2);
        assert_eq!(settings.telegram.threads.thread_for(Protocol::Mtproto), 7);
        assert_eq!(settings.telegram.threads.thread_for(Protocol::Trojan), 0);
        assert_eq!(settings.delivery.batch_size(Protocol::Trojan), 3);
        assert_eq!(settings.delivery.link_batch, 10);
        assert!(settings.telegram.is_authorized(42));
        assert!(settings.telegram.is_authorized(-1001234));
        assert!(!settings.telegram.is_authorized(7));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Settings::from_toml("[paths\ncache = 1").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_zero_batch_is_clamped() {
        let delivery = DeliverySettings {
            uri_batch: 0,
            ..DeliverySettings::default()
        };
        assert_eq!(delivery.batch_size(Protocol::Vless), 1);
    }
}

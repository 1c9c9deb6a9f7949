//! Turning fetched text into proxy entries.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::models::{Protocol, ProxyResult};

/// A line that starts with one of the cached schemes, up to the line end.
///
/// Leading blanks are skipped; a trailing carriage return is not part of
/// the entry.
static URI_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*((?:vless|vmess|trojan|ss)://[^\r\n]*)").expect("valid regex")
});

fn protocol_of(entry: &str) -> Option<Protocol> {
    Protocol::URI
        .into_iter()
        .find(|p| p.scheme().is_some_and(|s| entry.starts_with(s)))
}

/// Extract vless/vmess/trojan/ss entries from the cache text.
///
/// Entries are appended to `result` in cache order, duplicates included.
pub fn extract_uri_entries(content: &str, result: &mut ProxyResult) {
    for caps in URI_LINE.captures_iter(content) {
        let entry = &caps[1];
        if let Some(protocol) = protocol_of(entry) {
            result.push(protocol, entry);
        }
    }
}

/// Split a newline-delimited `host:port` list.
///
/// Everything after a carriage return is dropped and blank lines are skipped.
pub fn parse_socks5_list(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(|line| line.split('\r').next().unwrap_or_default())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Deserialize)]
struct MtprotoProxy {
    host: String,
    port: serde_json::Value,
    secret: String,
}

/// Render the MTProto JSON array into `tg://proxy` links.
pub fn parse_mtproto_list(content: &str) -> Result<Vec<String>, serde_json::Error> {
    let proxies: Vec<MtprotoProxy> = serde_json::from_str(content)?;
    Ok(proxies
        .into_iter()
        .map(|p| {
            let port = match &p.port {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("tg://proxy?server={}&port={}&secret={}", p.host, port, p.secret)
        })
        .collect())
}

//! Protocol model definitions
//!
//! The six connection-string formats the bot hands out.

use std::fmt;
use std::str::FromStr;

/// Represents the protocol of a proxy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Vless,
    Vmess,
    Trojan,
    Shadowsocks,
    Socks5,
    Mtproto,
}

impl Protocol {
    pub const ALL: [Protocol; 6] = [
        Protocol::Vless,
        Protocol::Vmess,
        Protocol::Trojan,
        Protocol::Shadowsocks,
        Protocol::Socks5,
        Protocol::Mtproto,
    ];

    /// Protocols extracted from the cache by scheme prefix, in match order.
    pub const URI: [Protocol; 4] = [
        Protocol::Vless,
        Protocol::Vmess,
        Protocol::Trojan,
        Protocol::Shadowsocks,
    ];

    /// Canonical lowercase name, also the key of the result mapping.
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Vless => "vless",
            Protocol::Vmess => "vmess",
            Protocol::Trojan => "trojan",
            Protocol::Shadowsocks => "shadowsocks",
            Protocol::Socks5 => "socks5",
            Protocol::Mtproto => "mtproto",
        }
    }

    /// Short command alias.
    pub fn alias(self) -> &'static str {
        match self {
            Protocol::Vless => "vl",
            Protocol::Vmess => "vm",
            Protocol::Trojan => "tr",
            Protocol::Shadowsocks => "ss",
            Protocol::Socks5 => "s5",
            Protocol::Mtproto => "mt",
        }
    }

    /// Human-readable title used in chat messages.
    pub fn title(self) -> &'static str {
        match self {
            Protocol::Vless => "Vless",
            Protocol::Vmess => "Vmess",
            Protocol::Trojan => "Trojan",
            Protocol::Shadowsocks => "Shadow Socks",
            Protocol::Socks5 => "Socks5",
            Protocol::Mtproto => "MtProto",
        }
    }

    /// URI scheme prefix for protocols that live in the cache.
    pub fn scheme(self) -> Option<&'static str> {
        match self {
            Protocol::Vless => Some("vless://"),
            Protocol::Vmess => Some("vmess://"),
            Protocol::Trojan => Some("trojan://"),
            Protocol::Shadowsocks => Some("ss://"),
            Protocol::Socks5 | Protocol::Mtproto => None,
        }
    }

    /// Whether entries come from a dedicated live endpoint instead of the cache.
    pub fn is_live(self) -> bool {
        self.scheme().is_none()
    }

    /// Whether delivered batches carry one link button per entry.
    pub fn has_link_buttons(self) -> bool {
        self.is_live()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Protocol::ALL
            .into_iter()
            .find(|p| p.name() == s || p.alias() == s)
            .ok_or_else(|| format!("unknown protocol: {}", s))
    }
}

//! Turning a list of entries into chat messages.
//!
//! Nothing here talks to a chat platform; the adapter only sends what
//! [`plan`] returns, pausing between messages.

use rand::seq::SliceRandom;
use rand::Rng;
use url::Url;

use crate::models::Protocol;
use crate::settings::DeliverySettings;

/// Buttons per keyboard row
pub const BUTTONS_PER_ROW: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: Url,
}

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// MarkdownV2 text
    pub text: String,
    pub buttons: Vec<LinkButton>,
}

impl Batch {
    /// Buttons laid out in rows of [`BUTTONS_PER_ROW`].
    pub fn button_rows(&self) -> Vec<&[LinkButton]> {
        self.buttons.chunks(BUTTONS_PER_ROW).collect()
    }
}

/// Escape text placed inside a MarkdownV2 pre block.
pub fn escape_code(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '`' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Message text for one batch of entries.
pub fn format_batch(protocol: Protocol, entries: &[String]) -> String {
    let body = entries
        .iter()
        .map(|e| escape_code(e))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "જ⁀➴ List of {} proxies \\(*Copy and Paste*\\)\n\n```plaintext\n{}```",
        protocol.title(),
        body
    )
}

/// Deep link that adds a SOCKS5 proxy in Telegram.
fn socks5_link(entry: &str) -> Option<Url> {
    let (host, port) = entry.rsplit_once(':')?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return None;
    }
    Url::parse_with_params("https://t.me/socks", &[("server", host), ("port", port)]).ok()
}

/// One button per entry for protocols delivered with links.
///
/// Entries that do not form a valid link get no button, but numbering
/// still follows the entry position.
pub fn link_buttons(protocol: Protocol, entries: &[String]) -> Vec<LinkButton> {
    if !protocol.has_link_buttons() {
        return Vec::new();
    }

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let url = match protocol {
                Protocol::Socks5 => socks5_link(entry),
                _ => Url::parse(entry).ok(),
            }?;
            Some(LinkButton {
                label: format!("⁀➴ Proxy {}", index + 1),
                url,
            })
        })
        .collect()
}

/// Shuffle, cut to the delivery limit and split into messages.
pub fn plan<R: Rng + ?Sized>(
    protocol: Protocol,
    mut entries: Vec<String>,
    settings: &DeliverySettings,
    rng: &mut R,
) -> Vec<Batch> {
    entries.shuffle(rng);
    entries.truncate(settings.limit);

    entries
        .chunks(settings.batch_size(protocol))
        .map(|chunk| Batch {
            text: format_batch(protocol, chunk),
            buttons: link_buttons(protocol, chunk),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entries(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_plan_limits_and_batches() {
        let mut rng = StdRng::seed_from_u64(7);
        let settings = DeliverySettings::default();
        let batches = plan(Protocol::Vless, entries("vless://", 123), &settings, &mut rng);

        // 100 entries, 5 per message
        assert_eq!(batches.len(), 20);
        assert!(batches.iter().all(|b| b.buttons.is_empty()));
        let total: usize = batches
            .iter()
            .map(|b| b.text.matches("vless://").count())
            .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_plan_short_list() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = DeliverySettings::default();
        let batches = plan(Protocol::Socks5, entries("10.0.0.1:", 12), &settings, &mut rng);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].buttons.len(), 10);
        assert_eq!(batches[1].buttons.len(), 2);
        assert_eq!(batches[0].button_rows().len(), 5);
    }

    #[test]
    fn test_plan_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let batches = plan(Protocol::Trojan, Vec::new(), &DeliverySettings::default(), &mut rng);
        assert!(batches.is_empty());
    }

    #[test]
    fn test_format_batch() {
        let text = format_batch(
            Protocol::Shadowsocks,
            &["ss://a".to_string(), "ss://b`c".to_string()],
        );
        assert_eq!(
            text,
            "જ⁀➴ List of Shadow Socks proxies \\(*Copy and Paste*\\)\n\n```plaintext\nss://a\n\nss://b\\`c```"
        );
    }

    #[test]
    fn test_socks5_buttons() {
        let buttons = link_buttons(
            Protocol::Socks5,
            &["1.2.3.4:1080".to_string(), "broken".to_string(), "5.6.7.8:9050".to_string()],
        );
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].label, "⁀➴ Proxy 1");
        assert_eq!(
            buttons[0].url.as_str(),
            "https://t.me/socks?server=1.2.3.4&port=1080"
        );
        assert_eq!(buttons[1].label, "⁀➴ Proxy 3");
    }

    #[test]
    fn test_mtproto_buttons_use_entry() {
        let entry = "tg://proxy?server=1.2.3.4&port=443&secret=abc".to_string();
        let buttons = link_buttons(Protocol::Mtproto, &[entry.clone()]);
        assert_eq!(buttons[0].url.as_str(), entry);
    }

    #[test]
    fn test_uri_protocols_have_no_buttons() {
        assert!(link_buttons(Protocol::Vmess, &["vmess://x".to_string()]).is_empty());
    }
}

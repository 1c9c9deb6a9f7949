use crate::models::Protocol;

pub const PING_REPLY: &str = "Hi Developer. I'm Online";

pub const HELP_TEXT: &str = "Here is some commands:\n\
update: Update proxy database\n\
start | bot | ping: Ping the bot\n\
vl | vless: Get Vless proxy\n\
vm | vmess: Get Vmess proxy\n\
tr | trojan: Get Trojan proxy\n\
ss | shadowsocks: Get ShadowSocks proxy\n\
mt | mtproto: Get MTproto proxy\n\
s5 | socks5: Get Socks5 proxy\n";

pub const UPDATE_PROMPT: &str = "Updating database... This can takes up to 1 minute!";

/// A chat command the bot reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Help,
    Update,
    Proxies(Protocol),
}

impl Command {
    /// Recognise a whole message text as a command.
    ///
    /// Matching is exact apart from surrounding whitespace, letter case, a
    /// leading `/` and a trailing `@botname`.
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.trim();
        let word = word.strip_prefix('/').unwrap_or(word);
        let word = word.split('@').next().unwrap_or_default().to_lowercase();

        match word.as_str() {
            "start" | "bot" | "ping" => Some(Command::Ping),
            "help" | "usage" => Some(Command::Help),
            "update" | "updatedb" => Some(Command::Update),
            other => other.parse::<Protocol>().ok().map(Command::Proxies),
        }
    }
}

pub fn uploading_prompt(protocol: Protocol) -> String {
    format!("Uploading {} proxies... Please be patient", protocol.name())
}

pub fn uploading_done(protocol: Protocol) -> String {
    format!("Uploading {} proxies... Done", protocol.name())
}

pub fn uploading_failed(protocol: Protocol) -> String {
    format!("Uploading {} proxies... Failed", protocol.name())
}

pub fn update_done(previous: &str) -> String {
    format!("Databases updated!\nPrevious update: {}", previous)
}

pub const UPDATE_FAILED: &str = "Database update failed, previous proxies are kept.";

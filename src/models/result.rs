use std::collections::BTreeMap;

use super::protocol::Protocol;

/// Per-query mapping from protocol to the entries found for it.
///
/// Entries keep the order in which they were seen and are never deduplicated.
/// Extraction appends, so build a fresh value for every logical query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResult {
    entries: BTreeMap<Protocol, Vec<String>>,
}

impl Default for ProxyResult {
    fn default() -> Self {
        ProxyResult::new()
    }
}

impl ProxyResult {
    /// Mapping with an empty sequence for each of the six protocols.
    pub fn new() -> Self {
        let entries = Protocol::ALL.into_iter().map(|p| (p, Vec::new())).collect();
        ProxyResult { entries }
    }

    pub fn get(&self, protocol: Protocol) -> &[String] {
        self.entries
            .get(&protocol)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn push(&mut self, protocol: Protocol, entry: impl Into<String>) {
        self.entries.entry(protocol).or_default().push(entry.into());
    }

    pub fn extend<I, S>(&mut self, protocol: Protocol, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(protocol)
            .or_default()
            .extend(entries.into_iter().map(Into::into));
    }

    /// Replace the sequence of a protocol wholesale.
    pub fn set(&mut self, protocol: Protocol, entries: Vec<String>) {
        self.entries.insert(protocol, entries);
    }

    pub fn take(&mut self, protocol: Protocol) -> Vec<String> {
        self.entries
            .get_mut(&protocol)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn len(&self, protocol: Protocol) -> usize {
        self.get(protocol).len()
    }

    /// Mapping keyed by canonical protocol name.
    pub fn into_named(self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .into_iter()
            .map(|(p, v)| (p.name().to_string(), v))
            .collect()
    }
}

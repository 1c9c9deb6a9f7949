//! Remote origins of proxy text.

use serde::{Deserialize, Serialize};

/// One remote origin of proxy text, as listed in the services file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "source")]
    pub url: String,
    /// Payload must be base64-decoded before use.
    #[serde(rename = "encryption", default)]
    pub is_base64: bool,
}

impl Source {
    pub fn raw(url: impl Into<String>) -> Self {
        Source {
            url: url.into(),
            is_base64: false,
        }
    }

    pub fn base64(url: impl Into<String>) -> Self {
        Source {
            url: url.into(),
            is_base64: true,
        }
    }

    /// Short `owner: repo` label for log lines.
    ///
    /// Falls back to the whole URL when it has fewer than five segments.
    pub fn label(&self) -> String {
        let parts: Vec<&str> = self.url.split('/').collect();
        if parts.len() >= 5 {
            parts[3..5].join(": ")
        } else {
            self.url.clone()
        }
    }
}

/// Ordered list of base sources used by a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<Source>) -> Self {
        SourceRegistry { sources }
    }

    /// Parse the JSON array form `[{"source": <url>, "encryption": <bool>}]`.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let sources: Vec<Source> = serde_json::from_str(content)?;
        Ok(SourceRegistry::new(sources))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_order() {
        let json = r#"[
            {"source": "https://raw.githubusercontent.com/a/b/main/sub", "encryption": true},
            {"source": "https://raw.githubusercontent.com/c/d/main/list.txt", "encryption": false}
        ]"#;
        let registry = SourceRegistry::from_json(json).unwrap();
        let sources: Vec<&Source> = registry.iter().collect();
        assert_eq!(sources.len(), 2);
        assert!(sources[0].is_base64);
        assert!(!sources[1].is_base64);
        assert_eq!(sources[1].url, "https://raw.githubusercontent.com/c/d/main/list.txt");
    }

    #[test]
    fn test_missing_encryption_defaults_to_raw() {
        let registry = SourceRegistry::from_json(r#"[{"source": "https://x.test/a"}]"#).unwrap();
        assert_eq!(registry.iter().next().unwrap(), &Source::raw("https://x.test/a"));
    }

    #[test]
    fn test_label() {
        let s = Source::raw("https://raw.githubusercontent.com/owner/repo/main/sub.txt");
        assert_eq!(s.label(), "owner: repo");
        let s = Source::raw("https://x.test");
        assert_eq!(s.label(), "https://x.test");
    }
}

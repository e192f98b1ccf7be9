use std::collections::{BTreeMap, HashMap, HashSet};

/// Category name -> ordered pattern strings, as loaded from the keywords file.
pub type CategoryMap = BTreeMap<String, Vec<String>>;

/// Category name -> unique strings matched on a single page.
pub type MatchSet = HashMap<String, HashSet<String>>;

pub const PROTOCOL_CATEGORIES: [&str; 8] = [
    "Vmess",
    "Vless",
    "Trojan",
    "ShadowSocks",
    "ShadowSocksR",
    "Tuic",
    "Hysteria2",
    "WireGuard",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Protocol,
    Country,
}

impl CategoryKind {
    pub fn of(name: &str) -> Self {
        if PROTOCOL_CATEGORIES.contains(&name) {
            CategoryKind::Protocol
        } else {
            CategoryKind::Country
        }
    }
}

/// Splits the configured categories into (protocol, country) maps.
pub fn partition_categories(categories: &CategoryMap) -> (CategoryMap, CategoryMap) {
    categories
        .iter()
        .map(|(name, patterns)| (name.clone(), patterns.clone()))
        .partition(|(name, _)| CategoryKind::of(name) == CategoryKind::Protocol)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub url: String,
    pub text: Option<String>,
}

impl PageResult {
    pub fn fetched(url: impl Into<String>, text: String) -> Self {
        Self { url: url.into(), text: Some(text) }
    }

    pub fn failed(url: impl Into<String>) -> Self {
        Self { url: url.into(), text: None }
    }

    pub fn is_fetched(&self) -> bool {
        self.text.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOutcome {
    pub saved: bool,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub pages_attempted: usize,
    pub pages_fetched: usize,
    pub protocol_counts: BTreeMap<String, usize>,
    pub country_counts: BTreeMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_names_classify_as_protocol() {
        for name in PROTOCOL_CATEGORIES {
            assert_eq!(CategoryKind::of(name), CategoryKind::Protocol);
        }
    }

    #[test]
    fn unknown_names_classify_as_country() {
        assert_eq!(CategoryKind::of("Germany"), CategoryKind::Country);
        // membership is exact, not case-insensitive
        assert_eq!(CategoryKind::of("vmess"), CategoryKind::Country);
    }

    #[test]
    fn partition_splits_by_name() {
        let mut categories = CategoryMap::new();
        categories.insert("Vmess".into(), vec![r"vmess://\S+".into()]);
        categories.insert("Trojan".into(), vec![r"trojan://\S+".into()]);
        categories.insert("Germany".into(), vec!["germany".into(), "🇩🇪".into()]);

        let (protocols, countries) = partition_categories(&categories);
        assert_eq!(protocols.keys().collect::<Vec<_>>(), ["Trojan", "Vmess"]);
        assert_eq!(countries.keys().collect::<Vec<_>>(), ["Germany"]);
        assert_eq!(countries["Germany"].len(), 2);
    }
}

use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::config::NAME_MARKER;
use crate::models::{CategoryMap, MatchSet, PROTOCOL_CATEGORIES};

/// Lower-cased display name following the first marker, if there is one.
pub fn name_segment(config: &str) -> Option<String> {
    config
        .split_once(NAME_MARKER)
        .map(|(_, name)| name.to_lowercase())
}

/// Cross-page accumulation of protocol configs and their country associations.
#[derive(Debug)]
pub struct Aggregator {
    country_keywords: Vec<(String, Vec<String>)>,
    protocols: BTreeMap<String, HashSet<String>>,
    countries: BTreeMap<String, HashSet<String>>,
}

impl Aggregator {
    pub fn new(countries: &CategoryMap) -> Self {
        let country_keywords = countries
            .iter()
            .map(|(name, keywords)| {
                let keywords = keywords
                    .iter()
                    .map(|k| k.to_lowercase())
                    .collect();
                (name.clone(), keywords)
            })
            .collect();

        Self {
            country_keywords,
            protocols: PROTOCOL_CATEGORIES
                .iter()
                .map(|name| (name.to_string(), HashSet::new()))
                .collect(),
            countries: countries
                .keys()
                .map(|name| (name.clone(), HashSet::new()))
                .collect(),
        }
    }

    /// Folds one page's matches into the global sets.
    pub fn add_page(&mut self, page_matches: &MatchSet) {
        let mut page_configs: HashSet<&str> = HashSet::new();

        for protocol in PROTOCOL_CATEGORIES {
            if let Some(found) = page_matches.get(protocol) {
                page_configs.extend(found.iter().map(String::as_str));
                if let Some(global) = self.protocols.get_mut(protocol) {
                    global.extend(found.iter().cloned());
                }
            }
        }

        for config in page_configs {
            self.associate(config);
        }
    }

    fn associate(&mut self, config: &str) {
        let Some(name) = name_segment(config) else {
            return;
        };
        if name.is_empty() {
            return;
        }

        for (country, keywords) in &self.country_keywords {
            // first hit is enough for this country; other countries are still checked
            if keywords.iter().any(|keyword| name.contains(keyword.as_str())) {
                if let Some(set) = self.countries.get_mut(country) {
                    if set.insert(config.to_string()) {
                        debug!("{} -> {}", config, country);
                    }
                }
            }
        }
    }

    pub fn protocols(&self) -> &BTreeMap<String, HashSet<String>> {
        &self.protocols
    }

    pub fn countries(&self) -> &BTreeMap<String, HashSet<String>> {
        &self.countries
    }

    pub fn into_sets(
        self,
    ) -> (
        BTreeMap<String, HashSet<String>>,
        BTreeMap<String, HashSet<String>>,
    ) {
        (self.protocols, self.countries)
    }
}

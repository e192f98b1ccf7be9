use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::{debug, error};

use crate::models::{CategoryMap, MatchSet};

/// One category's patterns, minus any that failed to compile.
#[derive(Debug)]
pub struct CompiledCategory {
    pub name: String,
    pub patterns: Vec<Regex>,
}

#[derive(Debug, Default)]
pub struct CompiledCategories {
    pub categories: Vec<CompiledCategory>,
    pub skipped: usize,
}

/// Case-insensitive, multiline; matches the flags every category pattern is run with.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
}

impl CompiledCategories {
    pub fn compile(categories: &CategoryMap) -> Self {
        let mut compiled = CompiledCategories::default();

        for (name, patterns) in categories {
            let mut regexes = Vec::with_capacity(patterns.len());
            for pattern in patterns {
                match compile_pattern(pattern) {
                    Ok(regex) => regexes.push(regex),
                    Err(e) => {
                        error!("Regex error in category '{}' for '{}': {}", name, pattern, e);
                        compiled.skipped += 1;
                    }
                }
            }
            compiled.categories.push(CompiledCategory {
                name: name.clone(),
                patterns: regexes,
            });
        }

        debug!(
            "Compiled {} categories ({} patterns skipped)",
            compiled.categories.len(),
            compiled.skipped
        );
        compiled
    }

    /// Runs every pattern over `text`; categories without a hit are left out.
    pub fn match_text(&self, text: &str) -> MatchSet {
        let mut matches = MatchSet::new();

        for category in &self.categories {
            let mut found = HashSet::new();
            for regex in &category.patterns {
                collect_matches(regex, text, &mut found);
            }
            if !found.is_empty() {
                matches.insert(category.name.clone(), found);
            }
        }

        matches
    }
}

// A pattern with exactly one capture group yields that group, otherwise the whole match.
fn collect_matches(regex: &Regex, text: &str, found: &mut HashSet<String>) {
    if regex.captures_len() == 2 {
        for cap in regex.captures_iter(text) {
            if let Some(group) = cap.get(1) {
                found.insert(group.as_str().to_string());
            }
        }
    } else {
        found.extend(regex.find_iter(text).map(|m| m.as_str().to_string()));
    }
}

/// Compiles `categories` and matches them against `text` in one go.
pub fn find_matches(text: &str, categories: &CategoryMap) -> MatchSet {
    CompiledCategories::compile(categories).match_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(entries: &[(&str, &[&str])]) -> CategoryMap {
        entries
            .iter()
            .map(|(name, patterns)| {
                (name.to_string(), patterns.iter().map(|p| p.to_string()).collect())
            })
            .collect()
    }

    #[test]
    fn matching_is_case_insensitive() {
        let cats = categories(&[("Word", &["abc"])]);
        let matches = find_matches("ABC AbC abc", &cats);
        let expected: HashSet<String> = ["ABC", "AbC", "abc"].iter().map(|s| s.to_string()).collect();
        assert_eq!(matches["Word"], expected);
    }

    #[test]
    fn duplicate_occurrences_collapse() {
        let cats = categories(&[("Vmess", &[r"vmess://\S+"])]);
        let matches = find_matches("vmess://a#x vmess://a#x vmess://b", &cats);
        assert_eq!(matches["Vmess"].len(), 2);
        assert!(matches["Vmess"].contains("vmess://a#x"));
        assert!(matches["Vmess"].contains("vmess://b"));
    }

    #[test]
    fn multiline_anchors_apply_per_line() {
        let cats = categories(&[("Trojan", &[r"^trojan://\S+$"])]);
        let matches = find_matches("trojan://a@h:1#one\ntrojan://b@h:2#two", &cats);
        assert_eq!(matches["Trojan"].len(), 2);
    }

    #[test]
    fn invalid_pattern_is_skipped_not_fatal() {
        let cats = categories(&[
            ("Vmess", &[r"vmess://(\S+", r"vmess://\S+"]),
            ("Trojan", &[r"trojan://\S+"]),
        ]);
        let compiled = CompiledCategories::compile(&cats);
        assert_eq!(compiled.skipped, 1);

        let matches = compiled.match_text("vmess://a trojan://b");
        assert!(matches["Vmess"].contains("vmess://a"));
        assert!(matches["Trojan"].contains("trojan://b"));
    }

    #[test]
    fn categories_without_matches_are_omitted() {
        let cats = categories(&[("Vmess", &[r"vmess://\S+"]), ("Tuic", &[r"tuic://\S+"])]);
        let matches = find_matches("vmess://only", &cats);
        assert!(matches.contains_key("Vmess"));
        assert!(!matches.contains_key("Tuic"));
    }

    #[test]
    fn single_group_pattern_yields_group_text() {
        let cats = categories(&[("Vless", &[r"link:\s*(vless://\S+)"])]);
        let matches = find_matches("link: vless://id@host:443#NL", &cats);
        assert_eq!(
            matches["Vless"].iter().collect::<Vec<_>>(),
            ["vless://id@host:443#NL"]
        );
    }

    #[test]
    fn multi_group_pattern_yields_whole_match() {
        let cats = categories(&[("Tuic", &[r"(tuic)://(\S+)"])]);
        let matches = find_matches("tuic://abc", &cats);
        assert!(matches["Tuic"].contains("tuic://abc"));
    }

    #[test]
    fn empty_text_matches_nothing() {
        let cats = categories(&[("Vmess", &[r"vmess://\S+"])]);
        assert!(find_matches("", &cats).is_empty());
    }
}

use std::path::Path;
use tokio::fs;

use crate::error::{HarvestError, Result};
use crate::models::CategoryMap;

async fn read_required(path: &Path) -> Result<String> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(HarvestError::MissingInput(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Trimmed, non-blank lines in file order. Duplicates are kept.
pub fn parse_urls(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn load_urls(path: &Path) -> Result<Vec<String>> {
    let text = read_required(path).await?;
    Ok(parse_urls(&text))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

pub fn parse_categories(text: &str, yaml: bool) -> Result<CategoryMap> {
    let categories: CategoryMap = if yaml {
        serde_yaml::from_str(text)?
    } else {
        serde_json::from_str(text)?
    };

    if let Some((name, _)) = categories.iter().find(|(name, _)| name.trim().is_empty()) {
        return Err(HarvestError::InvalidCategories(format!(
            "blank category name {:?}",
            name
        )));
    }
    Ok(categories)
}

pub async fn load_categories(path: &Path) -> Result<CategoryMap> {
    let text = read_required(path).await?;
    parse_categories(&text, is_yaml(path))
}

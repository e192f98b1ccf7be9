use chrono::{FixedOffset, Offset, Utc};
use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{error, info};

use crate::config::REPORT_UTC_OFFSET_SECS;
use crate::error::Result;
use crate::models::SaveOutcome;

/// Removes `dir` with everything in it and recreates it empty.
pub async fn prepare_output_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    fs::create_dir_all(dir).await?;
    Ok(())
}

pub fn category_file(dir: &Path, category: &str, extension: &str) -> PathBuf {
    dir.join(format!("{}.{}", category, extension))
}

/// Writes `items` sorted, one per line. Empty sets and write failures are not saved.
pub async fn save_category(
    dir: &Path,
    category: &str,
    items: &HashSet<String>,
    extension: &str,
) -> SaveOutcome {
    if items.is_empty() {
        return SaveOutcome::default();
    }

    let mut sorted: Vec<&String> = items.iter().collect();
    sorted.sort();

    let mut content = String::with_capacity(sorted.iter().map(|s| s.len() + 1).sum());
    for item in &sorted {
        content.push_str(item);
        content.push('\n');
    }

    let path = category_file(dir, category, extension);
    match fs::write(&path, content).await {
        Ok(()) => {
            info!("Saved {} items to {}", sorted.len(), path.display());
            SaveOutcome { saved: true, count: sorted.len() }
        }
        Err(e) => {
            error!("Failed to write file {}: {}", path.display(), e);
            SaveOutcome::default()
        }
    }
}

/// Saves every set and returns the counts of the ones actually written.
pub async fn save_all(
    dir: &Path,
    sets: &BTreeMap<String, HashSet<String>>,
    extension: &str,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for (category, items) in sets {
        let outcome = save_category(dir, category, items, extension).await;
        if outcome.saved {
            counts.insert(category.clone(), outcome.count);
        }
    }
    counts
}

pub fn report_timestamp() -> String {
    let offset = FixedOffset::east_opt(REPORT_UTC_OFFSET_SECS).unwrap_or(Utc.fix());
    Utc::now()
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string()
}

// Absolute form with `.` and `..` folded away lexically; symlinks are not resolved.
fn lexical_absolute(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Some(normalized)
}

/// Path of the output directory as seen from the report's directory.
pub fn link_prefix(report: &Path, output_dir: &Path) -> String {
    let base = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let (Some(base), Some(target)) = (lexical_absolute(base), lexical_absolute(output_dir)) else {
        return output_dir.to_string_lossy().replace('\\', "/");
    };

    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();
    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();
    // different roots (e.g. another drive) cannot be linked relatively
    if common == 0 {
        return target.to_string_lossy().replace('\\', "/");
    }

    let mut segments = vec!["..".to_string(); base_parts.len() - common];
    segments.extend(
        target_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    match segments.first().map(String::as_str) {
        None => ".".to_string(),
        Some("..") => segments.join("/"),
        Some(_) => format!("./{}", segments.join("/")),
    }
}

fn push_table(
    md: &mut String,
    counts: &BTreeMap<String, usize>,
    header: (&str, &str),
    empty_note: &str,
    link_prefix: &str,
    extension: &str,
) {
    if counts.is_empty() {
        md.push_str(empty_note);
        md.push_str("\n\n");
        return;
    }

    md.push_str(&format!("| {} | {} | Link |\n|---|---|---|\n", header.0, header.1));
    for (category, count) in counts {
        md.push_str(&format!(
            "| {0} | {1} | [`{0}.{2}`]({3}/{0}.{2}) |\n",
            category, count, extension, link_prefix
        ));
    }
    md.push('\n');
}

pub fn render_report(
    protocol_counts: &BTreeMap<String, usize>,
    country_counts: &BTreeMap<String, usize>,
    timestamp: &str,
    link_prefix: &str,
    extension: &str,
) -> String {
    let mut md = format!("# 📊 Extraction Results (last updated: {})\n\n", timestamp);
    md.push_str("This file is generated automatically.\n\n");
    md.push_str(
        "**Note:** country files only contain configs whose own name \
         (the part after `#`) mentions that country.\n\n",
    );

    md.push_str("## 📁 Protocol Files\n\n");
    push_table(
        &mut md,
        protocol_counts,
        ("Protocol", "Total"),
        "No protocol configs found.",
        link_prefix,
        extension,
    );

    md.push_str("## 🌍 Country Files\n\n");
    push_table(
        &mut md,
        country_counts,
        ("Country", "Associated configs"),
        "No country-associated configs found.",
        link_prefix,
        extension,
    );

    md
}

pub async fn write_report(path: &Path, content: &str) -> bool {
    match fs::write(path, content).await {
        Ok(()) => {
            info!("Generated {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to write {}: {}", path.display(), e);
            false
        }
    }
}

//! Evaluation items read from JSONL.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One multiple-choice question about an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalItem {
    pub id: String,
    pub image: PathBuf,
    pub question: String,
    pub choices: Vec<String>,
    /// Ground truth; must be one of `choices` when present.
    #[serde(default)]
    pub answer: Option<String>,
}

fn invalid_item(line_no: usize, msg: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!("line {}: invalid item: {}", line_no, msg)
}

/// Parse JSONL items. Blank lines are skipped; relative image paths are resolved
/// against `base_dir`.
pub fn parse_items(raw: &str, base_dir: &Path) -> anyhow::Result<Vec<EvalItem>> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for (i, line) in raw.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let mut item: EvalItem = serde_json::from_str(line).map_err(|e| {
            anyhow::anyhow!(
                "line {}: Invalid item format. Expected JSONL object.\n  Error: {}\n  Content: {}",
                line_no,
                e,
                line.chars().take(50).collect::<String>()
            )
        })?;

        if item.choices.is_empty() {
            return Err(invalid_item(line_no, format!("'{}' has no choices", item.id)));
        }
        if let Some(i) = item.choices.iter().position(|c| c.trim().is_empty()) {
            return Err(invalid_item(line_no, format!("'{}' choice {} is empty", item.id, i)));
        }
        if let Some(answer) = &item.answer {
            if !item.choices.contains(answer) {
                return Err(invalid_item(
                    line_no,
                    format!("'{}' answer '{}' is not among its choices", item.id, answer),
                ));
            }
        }
        if !seen.insert(item.id.clone()) {
            return Err(invalid_item(line_no, format!("duplicate id '{}'", item.id)));
        }
        if item.image.is_relative() {
            item.image = base_dir.join(&item.image);
        }
        items.push(item);
    }

    Ok(items)
}

pub fn load_items(path: &Path) -> anyhow::Result<Vec<EvalItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to open items file '{}'", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_items(&raw, base_dir)
}

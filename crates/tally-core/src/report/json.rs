use crate::report::RunArtifacts;
use anyhow::Context;
use std::path::Path;

pub fn write_json(artifacts: &RunArtifacts, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let v = serde_json::json!({
        "run_id": artifacts.run_id,
        "model": artifacts.model,
        "summary": artifacts.summary,
        "items": artifacts.items,
    });
    std::fs::write(out, serde_json::to_string_pretty(&v)?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}

use super::CacheTarget;
use crate::exit_codes;
use std::path::PathBuf;
use tally_core::cache::{CacheStats, ResponseCache, DEFAULT_SIZE_LIMIT};
use tally_core::config::load_config;

/// Cache directory and size limit from `--dir`, else from the config file.
fn resolve(target: &CacheTarget) -> Result<(PathBuf, u64), String> {
    let cfg = match load_config(&target.config) {
        Ok(cfg) => Some(cfg),
        Err(e) if target.dir.is_none() => return Err(e.to_string()),
        Err(_) => None,
    };
    let size_limit = cfg
        .as_ref()
        .map_or(DEFAULT_SIZE_LIMIT, |c| c.evaluator.cache_size_limit);

    match (&target.dir, cfg.and_then(|c| c.evaluator.cache_path)) {
        (Some(dir), _) => Ok((dir.clone(), size_limit)),
        (None, Some(path)) => Ok((path, size_limit)),
        (None, None) => Err(format!(
            "{} has no evaluator.cache_path and --dir was not given",
            target.config.display()
        )),
    }
}

pub fn cmd_stats(target: CacheTarget) -> anyhow::Result<i32> {
    let (dir, size_limit) = match resolve(&target) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    // inspection never creates the cache
    let stats = if dir.exists() {
        ResponseCache::open(&dir, size_limit)?.stats()?
    } else {
        CacheStats {
            path: dir,
            entries: 0,
            volume: 0,
            size_limit,
        }
    };

    if target.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("cache:   {}", stats.path.display());
        println!("entries: {}", stats.entries);
        println!("volume:  {} / {} bytes", stats.volume, stats.size_limit);
    }
    Ok(exit_codes::SUCCESS)
}

pub fn cmd_clear(target: CacheTarget) -> anyhow::Result<i32> {
    let (dir, size_limit) = match resolve(&target) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("{msg}");
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let removed = if dir.exists() {
        ResponseCache::open(&dir, size_limit)?.clear()?
    } else {
        0
    };
    println!("removed {removed} entries from {}", dir.display());
    Ok(exit_codes::SUCCESS)
}

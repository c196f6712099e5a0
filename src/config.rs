use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const TRACKER_DIR: &str = ".issue-tracker";
pub const DB_FILE: &str = "issues.db";

/// Pick the database file: an explicit path wins, otherwise the nearest
/// `.issue-tracker/issues.db` above `start`, otherwise a new one in `start`.
pub fn resolve_db_path(explicit: Option<&Path>, start: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(dir) = find_tracker_dir(start) {
        return Ok(dir.join(DB_FILE));
    }

    let dir = start.join(TRACKER_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    tracing::info!(dir = %dir.display(), "Created tracker directory");
    Ok(dir.join(DB_FILE))
}

fn find_tracker_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(TRACKER_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

use crate::error::VerseError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Create each directory (and missing ancestors) that does not exist yet.
/// Returns the directories that were actually created.
pub fn ensure_directories(dirs: &[&Path]) -> Result<Vec<PathBuf>, VerseError> {
    let mut created = Vec::new();
    for dir in dirs {
        if dir.is_dir() {
            continue;
        }
        fs::create_dir_all(dir).map_err(|e| VerseError::filesystem(*dir, e))?;
        debug!(path = %dir.display(), "created directory");
        created.push(dir.to_path_buf());
    }
    Ok(created)
}

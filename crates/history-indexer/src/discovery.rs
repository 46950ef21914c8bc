//! File discovery for history JSONL logs

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find all `*.jsonl` files under `dir`, sorted by path
pub fn find_log_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "jsonl"))
        .collect();

    files.sort();
    files
}

use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Finds all XML files below `path`, recursively.
///
/// Files are returned sorted by path so the discovery order, and with it the
/// row order of the output table, is stable across runs and platforms.
///
/// # Errors
///
/// Returns an error if `path` does not exist or is not a directory.
pub fn find_xmls(path: &Path) -> AppResult<Vec<PathBuf>> {
    if !path.is_dir() {
        return Err(AppError::IoError(format!(
            "Directory does not exist: {}",
            path.display()
        )));
    }
    Ok(collect_xmls(path))
}

/// Recursively collects `.xml` files in a directory (including subdirs).
pub(crate) fn collect_xmls(dir: &Path) -> Vec<PathBuf> {
    let mut v = Vec::with_capacity(20);
    let walker = walkdir::WalkDir::new(dir).sort_by_file_name().into_iter();
    for entry in walker.flatten() {
        if entry.file_type().is_file() {
            if let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) {
                if ext.eq_ignore_ascii_case("xml") {
                    v.push(entry.path().to_path_buf());
                }
            }
        }
    }
    v
}

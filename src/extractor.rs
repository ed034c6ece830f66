use crate::errors::{AppError, AppResult};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Unpacks a staged upload into its own folder under `extract_root`.
///
/// A `.zip` upload is extracted member by member; any other upload (a single
/// XML document) is copied as-is. The target folder is named after the upload's
/// file stem, e.g. `uploads/extracted/march/` for `march.zip`.
///
/// # Behavior
///
/// - **Fresh folder**: A target folder left by an earlier run (of this upload or
///   another one with the same stem) is removed first, so only the current
///   upload's documents are found there.
/// - **Unsafe members**: Archive members whose path would escape the target
///   folder are skipped.
///
/// # Returns
///
/// Returns the folder containing the extracted documents.
///
/// # Errors
///
/// Returns an error if the upload has no usable file name, the archive cannot be
/// read, or any file operation fails.
pub fn extract_upload(upload_path: &Path, extract_root: &Path) -> AppResult<PathBuf> {
    let stem = upload_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::InvalidInput(format!("Invalid upload file name: {}", upload_path.display()))
        })?;
    let extract_dir = extract_root.join(stem);

    if extract_dir.exists() {
        debug!(
            upload = %upload_path.display(),
            extract_dir = %extract_dir.display(),
            "Removing previous extraction"
        );
        fs::remove_dir_all(&extract_dir).map_err(|e| {
            AppError::IoError(format!(
                "Failed to remove previous extraction {}: {e}",
                extract_dir.display()
            ))
        })?;
    }

    fs::create_dir_all(&extract_dir).map_err(|e| {
        AppError::IoError(format!(
            "Failed to create extraction directory {}: {e}",
            extract_dir.display()
        ))
    })?;

    if is_zip(upload_path) {
        let extracted = extract_zip(upload_path, &extract_dir).map_err(|e| {
            // Leave no half-extracted folder behind for the next run to reuse
            if let Err(remove_err) = fs::remove_dir_all(&extract_dir) {
                warn!(dir = %extract_dir.display(), error = %remove_err, "Failed to remove partial extraction");
            }
            e
        })?;
        info!(upload = %upload_path.display(), files = extracted, "Archive extracted");
    } else {
        let file_name = upload_path.file_name().ok_or_else(|| {
            AppError::InvalidInput(format!("Invalid upload file name: {}", upload_path.display()))
        })?;
        let target = extract_dir.join(file_name);
        fs::copy(upload_path, &target).map_err(|e| {
            AppError::IoError(format!(
                "Failed to copy {} to {}: {e}",
                upload_path.display(),
                target.display()
            ))
        })?;
        info!(upload = %upload_path.display(), "Single document staged for parsing");
    }

    Ok(extract_dir)
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

/// Extracts every file member of the archive into `extract_dir`.
/// Returns the number of files written.
fn extract_zip(zip_path: &Path, extract_dir: &Path) -> AppResult<usize> {
    let file = File::open(zip_path).map_err(|e| {
        AppError::IoError(format!(
            "Failed to open ZIP file {}: {e}",
            zip_path.display()
        ))
    })?;

    let mut archive = ZipArchive::new(file).map_err(|e| {
        AppError::ZipError(format!(
            "Failed to read ZIP archive {}: {e}",
            zip_path.display()
        ))
    })?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut member = archive.by_index(i).map_err(|e| {
            AppError::ZipError(format!(
                "Failed to read file {i} from ZIP {}: {e}",
                zip_path.display()
            ))
        })?;

        let out_path = match member.enclosed_name() {
            Some(path) => extract_dir.join(path),
            None => {
                debug!(member = member.name(), "Skipping unsafe archive member");
                continue;
            }
        };

        // Directories are created when their files are extracted
        if member.is_dir() {
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut out_file = File::create(&out_path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to create file {}: {e}",
                out_path.display()
            ))
        })?;

        std::io::copy(&mut member, &mut out_file).map_err(|e| {
            AppError::IoError(format!(
                "Failed to copy file from ZIP {} to {}: {e}",
                zip_path.display(),
                out_path.display()
            ))
        })?;
        written += 1;
    }

    Ok(written)
}

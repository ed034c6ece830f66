use crate::constants::{ALLOWED_EXTENSIONS, FILENAME_STRIP_PATTERN, WINDOWS_DEVICE_NAMES};
use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

/// Cached regex for characters not allowed in stored file names.
static FILENAME_STRIP_REGEX: OnceLock<Regex> = OnceLock::new();

/// Returns true if the file name has an accepted extension (`zip` or `xml`, any case).
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reduces a user-supplied file name to a safe, flat ASCII name.
///
/// Accents are decomposed and dropped, path separators and whitespace runs
/// become `_`, anything outside `[A-Za-z0-9_.-]` is removed and leading or
/// trailing dots and underscores are trimmed. Names that collide with Windows
/// device files get a `_` prefix. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let strip = FILENAME_STRIP_REGEX.get_or_init(|| {
        Regex::new(FILENAME_STRIP_PATTERN).expect("FILENAME_STRIP_PATTERN is a valid regex pattern")
    });
    let cleaned = strip.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default().to_uppercase();
    if !trimmed.is_empty() && WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Copies `source` into `upload_dir` under its sanitized name and returns that name.
///
/// The returned name is the identifier later passed to the process step.
///
/// # Errors
///
/// Returns `InvalidInput` if the extension is not accepted or nothing is left of
/// the name after sanitization, and `IoError` if the copy fails.
pub fn stage_upload(source: &Path, upload_dir: &Path) -> AppResult<String> {
    let original = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            AppError::InvalidInput(format!("Invalid upload file name: {}", source.display()))
        })?;

    if !allowed_file(original) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported file type: {original} (expected one of: {})",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    let filename = secure_filename(original);
    if filename.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "File name {original} is empty after sanitization"
        )));
    }

    fs::create_dir_all(upload_dir).map_err(|e| {
        AppError::IoError(format!(
            "Failed to create upload directory {}: {e}",
            upload_dir.display()
        ))
    })?;

    let target = upload_dir.join(&filename);
    let bytes = fs::copy(source, &target).map_err(|e| {
        AppError::IoError(format!(
            "Failed to store upload {} as {}: {e}",
            source.display(),
            target.display()
        ))
    })?;

    info!(original = original, stored = %target.display(), bytes = bytes, "Upload staged");
    Ok(filename)
}

/// Resolves an upload identifier to the stored file.
///
/// # Errors
///
/// Returns `InvalidInput` if the identifier is not a sanitized name or no such
/// upload exists.
pub fn resolve_upload(upload_dir: &Path, upload_id: &str) -> AppResult<PathBuf> {
    if upload_id.is_empty() || secure_filename(upload_id) != upload_id {
        return Err(AppError::InvalidInput(format!(
            "Invalid upload identifier: {upload_id}"
        )));
    }
    let path = upload_dir.join(upload_id);
    if !path.is_file() {
        return Err(AppError::InvalidInput(format!(
            "No uploaded file named {upload_id} in {}",
            upload_dir.display()
        )));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_allowed_file_extensions() {
        assert!(allowed_file("invoices.zip"));
        assert!(allowed_file("invoice.XML"));
        assert!(allowed_file("archive.tar.zip"));
        assert!(!allowed_file("invoice.pdf"));
        assert!(!allowed_file("xml"));
        assert!(!allowed_file("invoice."));
    }

    #[test]
    fn test_secure_filename_replaces_whitespace() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
    }

    #[test]
    fn test_secure_filename_flattens_paths() {
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("..\\windows\\hoadon.xml"), "windows_hoadon.xml");
    }

    #[test]
    fn test_secure_filename_strips_accents() {
        assert_eq!(secure_filename("hóa đơn tháng 3.zip"), "hoa_on_thang_3.zip");
        assert_eq!(secure_filename("i contain cool ümläuts.txt"), "i_contain_cool_umlauts.txt");
    }

    #[test]
    fn test_secure_filename_windows_device_names() {
        assert_eq!(secure_filename("NUL.xml"), "_NUL.xml");
        assert_eq!(secure_filename("con"), "_con");
        assert_eq!(secure_filename("console.xml"), "console.xml");
    }

    #[test]
    fn test_secure_filename_can_be_empty() {
        assert_eq!(secure_filename("..."), "");
        assert_eq!(secure_filename("đ"), "");
    }

    #[test]
    fn test_stage_upload_copies_sanitized_name() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("hóa đơn.xml");
        fs::write(&source, "<HDon/>").unwrap();
        let upload_dir = temp_dir.path().join("uploads");

        let id = stage_upload(&source, &upload_dir).unwrap();
        assert_eq!(id, "hoa_on.xml");
        assert_eq!(
            fs::read_to_string(upload_dir.join(&id)).unwrap(),
            "<HDon/>"
        );
        assert_eq!(resolve_upload(&upload_dir, &id).unwrap(), upload_dir.join(&id));
    }

    #[test]
    fn test_stage_upload_rejects_extension() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("invoice.pdf");
        fs::write(&source, "%PDF").unwrap();

        let err = stage_upload(&source, &temp_dir.path().join("uploads")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_resolve_upload_rejects_traversal_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(resolve_upload(temp_dir.path(), "../secret.xml").is_err());
        assert!(resolve_upload(temp_dir.path(), "missing.xml").is_err());
        assert!(resolve_upload(temp_dir.path(), "").is_err());
    }
}

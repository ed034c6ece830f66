use crate::errors::AppResult;
use std::path::Path;
use tracing::{info, warn};

/// Deletes the extraction folder of an upload after its table has been written.
///
/// The staged upload and the generated table are kept.
///
/// # Error Handling
///
/// A failed deletion is logged as a warning and does not fail the run.
pub async fn cleanup_extraction(extract_dir: &Path, should_cleanup: bool) -> AppResult<()> {
    if !should_cleanup {
        info!("Cleanup skipped");
        return Ok(());
    }

    if !extract_dir.exists() {
        info!("Extraction directory does not exist, skipping cleanup");
        return Ok(());
    }

    match tokio::fs::remove_dir_all(extract_dir).await {
        Ok(_) => info!(dir = %extract_dir.display(), "Extraction directory removed"),
        Err(e) => warn!(
            dir = %extract_dir.display(),
            error = %e,
            "Failed to remove extraction directory"
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn cleanup_removes_directory_when_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("extracted/march");
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("nested/a.xml"), "<HDon/>").unwrap();

        cleanup_extraction(&dir, true).await.unwrap();
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn cleanup_keeps_directory_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("extracted/march");
        std::fs::create_dir_all(&dir).unwrap();

        cleanup_extraction(&dir, false).await.unwrap();
        assert!(dir.exists());
    }

    #[tokio::test]
    async fn cleanup_missing_directory_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        assert!(cleanup_extraction(&temp_dir.path().join("missing"), true)
            .await
            .is_ok());
    }
}

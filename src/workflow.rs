use crate::cleanup::cleanup_extraction;
use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::extractor::extract_upload;
use crate::parser::{process_directory, write_table};
use crate::uploader::{resolve_upload, stage_upload};
use crate::utils::kb_from_bytes;
use std::path::{Path, PathBuf};
use tracing::info;

/// What a processing run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub output_path: PathBuf,
    pub invoices: usize,
}

/// Stages a local file as an upload and returns its identifier.
pub fn upload(source: &Path, config: &ResolvedConfig) -> AppResult<String> {
    stage_upload(source, &config.upload_dir)
}

/// Turns a staged upload into the output table.
///
/// 1. Resolves `upload_id` inside `upload_dir`
/// 2. Extracts it into `{upload_dir}/{extract_dir_name}/{stem}/`
/// 3. Parses every XML document found there and aggregates their invoices
/// 4. Writes the table to `output`, or `{upload_dir}/{output_stem}.{ext}` by default
/// 5. Removes the extraction folder if `cleanup` is enabled
///
/// # Errors
///
/// Fails if the upload does not exist, extraction fails, any document fails
/// (unless `skip_invalid_documents` is set) or the table cannot be written.
/// Nothing is written when a document fails.
pub async fn process_upload(
    upload_id: &str,
    config: &ResolvedConfig,
    output: Option<&Path>,
) -> AppResult<ProcessSummary> {
    let upload_path = resolve_upload(&config.upload_dir, upload_id)?;
    let extract_root = config.extract_root();

    info!(upload = upload_id, "Starting extraction phase");
    let extract_dir = tokio::task::spawn_blocking(move || extract_upload(&upload_path, &extract_root))
        .await
        .map_err(|e| AppError::IoError(format!("Task join error: {e}")))??;

    let table = process_directory(&extract_dir, config).await?;

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_path());
    write_table(
        &table,
        &output_path,
        config.output_format,
        config.header_language,
    )?;

    let size_kb = std::fs::metadata(&output_path)
        .map(|m| kb_from_bytes(m.len()))
        .unwrap_or_default();
    info!(
        invoices = table.len(),
        output = %output_path.display(),
        format = config.output_format.extension(),
        output_size_kb = size_kb,
        "Table written"
    );

    cleanup_extraction(&extract_dir, config.cleanup).await?;

    Ok(ProcessSummary {
        output_path,
        invoices: table.len(),
    })
}

/// Stages `source` and processes it in one go.
pub async fn run(
    source: &Path,
    config: &ResolvedConfig,
    output: Option<&Path>,
) -> AppResult<ProcessSummary> {
    let upload_id = upload(source, config)?;
    process_upload(&upload_id, config, output).await
}

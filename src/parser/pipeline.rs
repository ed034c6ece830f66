use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::RowTable;
use crate::ui::create_progress_bar;
use crate::utils::format_duration;
use futures::stream::{self, StreamExt, TryStreamExt};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs as tokio_fs;
use tracing::{info, warn};

use super::aggregate::{aggregate_sources_lenient, try_aggregate_sources_par, AggregateReport};
use super::file_finder::find_xmls;

/// Reads files concurrently; `buffered` yields results in input order.
async fn read_xml_contents(paths: &[PathBuf], concurrency: usize) -> AppResult<Vec<Vec<u8>>> {
    stream::iter(paths.iter().cloned())
        .map(|path| async move {
            tokio_fs::read(&path).await.map_err(|e| {
                AppError::IoError(format!("Failed to read XML file {}: {e}", path.display()))
            })
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

fn build_thread_pool(threads: usize) -> AppResult<Option<ThreadPool>> {
    if threads == 0 {
        return Ok(None);
    }
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map(Some)
        .map_err(|e| AppError::InvalidInput(format!("Failed to build parser thread pool: {e}")))
}

fn in_pool<R: Send>(pool: Option<&ThreadPool>, op: impl FnOnce() -> R + Send) -> R {
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Parses every XML file below `dir` and aggregates their invoices into one table.
///
/// # Workflow
///
/// 1. Finds all `.xml` files under `dir` (sorted, recursive)
/// 2. Reads them in chunks of `batch_size`, `read_concurrency` files at a time
/// 3. Parses and extracts each chunk in parallel on rayon
/// 4. Appends each chunk's rows in file order
///
/// # Behavior
///
/// - **Fail fast** (default): the first failing file, in discovery order, aborts the
///   run with a `DocumentError` naming the file.
/// - **Skip invalid** (`skip_invalid_documents = true`): failing files are logged
///   and left out of the table.
///
/// # Errors
///
/// Returns an error if the directory is missing, a file cannot be read, or a
/// document fails while skipping is disabled.
pub async fn process_directory(dir: &Path, config: &ResolvedConfig) -> AppResult<RowTable> {
    let xml_files = find_xmls(dir)?;
    let mut table = RowTable::new();

    if xml_files.is_empty() {
        warn!(dir = %dir.display(), "No XML files found");
        return Ok(table);
    }

    let pool = build_thread_pool(config.parser_threads)?;
    let start = Instant::now();
    let pb = create_progress_bar(xml_files.len() as u64)?;
    let mut skipped = 0usize;

    info!(files = xml_files.len(), dir = %dir.display(), "Starting XML parsing");

    for xml_chunk in xml_files.chunks(config.batch_size.max(1)) {
        let contents = read_xml_contents(xml_chunk, config.read_concurrency).await?;
        if config.skip_invalid_documents {
            let report: AggregateReport = in_pool(pool.as_ref(), || aggregate_sources_lenient(&contents));
            for failure in report.failures {
                let path = &xml_chunk[failure.index];
                warn!(file = %path.display(), error = %failure.error, "Skipping invalid document");
                skipped += 1;
            }
            table.append(report.table.into_rows());
        } else {
            match in_pool(pool.as_ref(), || try_aggregate_sources_par(&contents)) {
                Ok(chunk_table) => table.append(chunk_table.into_rows()),
                Err(failure) => {
                    let path = &xml_chunk[failure.index];
                    pb.abandon_with_message(format!("Failed {}", path.display()));
                    return Err(AppError::DocumentError {
                        path: path.display().to_string(),
                        source: Box::new(failure.error),
                    });
                }
            }
        }
        pb.inc(xml_chunk.len() as u64);
    }

    pb.finish_with_message(format!("Parsed {} XML file(s)", xml_files.len()));

    info!(
        xml_files = xml_files.len(),
        skipped = skipped,
        invoices = table.len(),
        elapsed = format_duration(start.elapsed()),
        "Parsing completed"
    );

    Ok(table)
}

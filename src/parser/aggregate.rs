use super::invoice::{extract, extract_bytes};
use super::xml_tree::XmlElement;
use crate::errors::{AppError, AppResult};
use crate::models::{InvoiceRecord, RowTable};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Extracts every document in order and concatenates the records into one table.
///
/// Fails fast: the first document that fails to extract aborts the whole run.
pub fn aggregate(documents: &[XmlElement]) -> AppResult<RowTable> {
    let mut table = RowTable::new();
    for document in documents {
        table.append(extract(document)?);
    }
    Ok(table)
}

/// Like [`aggregate`], but takes raw XML buffers and parses each one first.
pub fn aggregate_sources<B: AsRef<[u8]>>(sources: &[B]) -> AppResult<RowTable> {
    let mut table = RowTable::new();
    for source in sources {
        table.append(extract_bytes(source.as_ref())?);
    }
    Ok(table)
}

/// Parallel [`aggregate_sources`]. Documents are extracted on the current rayon
/// pool; rows are still concatenated in input order and the reported error is
/// the one from the earliest failing document.
pub fn aggregate_sources_par<B: AsRef<[u8]> + Sync>(sources: &[B]) -> AppResult<RowTable> {
    try_aggregate_sources_par(sources).map_err(|failure| failure.error)
}

/// [`aggregate_sources_par`] that also reports the index of the failing document.
///
/// Once a document fails, documents after it are no longer extracted.
pub fn try_aggregate_sources_par<B: AsRef<[u8]> + Sync>(
    sources: &[B],
) -> Result<RowTable, DocumentFailure> {
    let first_failure = AtomicUsize::new(usize::MAX);
    let results: Vec<Option<AppResult<Vec<InvoiceRecord>>>> = sources
        .par_iter()
        .enumerate()
        .map(|(index, source)| {
            if index > first_failure.load(Ordering::Relaxed) {
                return None;
            }
            let result = extract_bytes(source.as_ref());
            if result.is_err() {
                first_failure.fetch_min(index, Ordering::Relaxed);
            }
            Some(result)
        })
        .collect();

    // Every skipped document comes after a failed one, so the loop returns before reaching it
    let mut table = RowTable::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Some(Ok(records)) => table.append(records),
            Some(Err(error)) => return Err(DocumentFailure { index, error }),
            None => break,
        }
    }
    Ok(table)
}

/// A document that could not be extracted, identified by its index in the input.
#[derive(Debug)]
pub struct DocumentFailure {
    pub index: usize,
    pub error: AppError,
}

/// Outcome of a partial-success aggregation.
#[derive(Debug, Default)]
pub struct AggregateReport {
    /// Rows of every document that extracted cleanly, in input order.
    pub table: RowTable,
    /// Failed documents in input order.
    pub failures: Vec<DocumentFailure>,
}

/// Extracts all documents in parallel, keeping the rows of the ones that succeed
/// and collecting the errors of the ones that do not.
pub fn aggregate_sources_lenient<B: AsRef<[u8]> + Sync>(sources: &[B]) -> AggregateReport {
    let mut report = AggregateReport::default();
    for (index, result) in extract_each_par(sources).into_iter().enumerate() {
        match result {
            Ok(records) => report.table.append(records),
            Err(error) => report.failures.push(DocumentFailure { index, error }),
        }
    }
    report
}

fn extract_each_par<B: AsRef<[u8]> + Sync>(sources: &[B]) -> Vec<AppResult<Vec<InvoiceRecord>>> {
    // Indexed collect keeps input order regardless of completion order
    sources
        .par_iter()
        .map(|source| extract_bytes(source.as_ref()))
        .collect()
}

use crate::models::Subtree;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Input bytes are not well-formed XML
    #[error("Parse error: {0}")]
    ParseError(String),
    /// A structural subtree the extractor dereferences is missing
    #[error("Structure error: invoice element #{position} has no {subtree} subtree")]
    StructureError { subtree: Subtree, position: usize },
    /// Wraps a failure with the path of the document that caused it
    #[error("Failed to process {path}: {source}")]
    DocumentError {
        path: String,
        #[source]
        source: Box<AppError>,
    },
    /// Archive could not be read
    #[error("ZIP error: {0}")]
    ZipError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
    /// Spreadsheet or table serialization failed
    #[error("Write error: {0}")]
    WriteError(String),
}

// Conversion implementations for common errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::WriteError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;

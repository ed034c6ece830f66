use crate::constants::{DEFAULT_EXTRACT_DIR_NAME, DEFAULT_OUTPUT_STEM, DEFAULT_UPLOAD_DIR};
use crate::errors::{AppError, AppResult};
use crate::models::{HeaderLanguage, OutputFormat};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved configuration with all values filled in (no Options).
///
/// This struct represents the pipeline defaults and can be deserialized by the TOML
/// loader. Keys missing from the file keep their default value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Directory where uploaded files are staged
    pub upload_dir: PathBuf,
    /// Name of the extraction folder inside `upload_dir`
    pub extract_dir_name: String,
    /// File name (without extension) of the generated table inside `upload_dir`
    pub output_stem: String,
    /// Format of the generated table
    pub output_format: OutputFormat,
    /// Language of the column headers
    pub header_language: HeaderLanguage,

    // Processing
    /// Number of XML files read and extracted per chunk.
    /// This bounds the raw XML held in memory at once.
    pub batch_size: usize,
    /// Number of concurrent XML file reads.
    pub read_concurrency: usize,
    /// Number of threads for the extraction rayon pool.
    /// When set to 0 (default), rayon's global pool is used.
    pub parser_threads: usize,
    /// Keep going when a document fails to parse or extract, logging and skipping it.
    pub skip_invalid_documents: bool,
    /// Remove the extraction folder once the table has been written.
    pub cleanup: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            extract_dir_name: DEFAULT_EXTRACT_DIR_NAME.to_string(),
            output_stem: DEFAULT_OUTPUT_STEM.to_string(),
            output_format: OutputFormat::Xlsx,
            header_language: HeaderLanguage::En,
            batch_size: 150,
            read_concurrency: 16,
            parser_threads: 0, // 0 means rayon's global pool
            skip_invalid_documents: false,
            cleanup: false,
        }
    }
}

impl ResolvedConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// Rejects unknown keys to prevent typos from being silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, unknown keys are present,
    /// or batch_size/read_concurrency are not positive.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ResolvedConfig = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.batch_size == 0 {
            return Err(AppError::InvalidInput(
                "Batch size must be greater than 0".into(),
            ));
        }
        if self.read_concurrency == 0 {
            return Err(AppError::InvalidInput(
                "Read concurrency must be greater than 0".into(),
            ));
        }
        if self.extract_dir_name.trim().is_empty() || self.output_stem.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "extract_dir_name and output_stem must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Root folder that uploads are extracted into.
    pub fn extract_root(&self) -> PathBuf {
        self.upload_dir.join(&self.extract_dir_name)
    }

    /// Default location of the generated table.
    pub fn output_path(&self) -> PathBuf {
        self.upload_dir.join(format!(
            "{}.{}",
            self.output_stem,
            self.output_format.extension()
        ))
    }
}

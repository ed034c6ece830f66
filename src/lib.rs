//! hoadon-cli library
//!
//! This crate provides the core functionality for the `hoadon-cli` binary.
//! The crate root only declares modules; implementation and tests live in the modules.
//!
//! ## Overview
//!
//! The library turns Vietnamese e-invoice XML documents into a summary table:
//!
//! - [`parser`] - Parses invoice XML, extracts one row per invoice and aggregates rows across documents
//! - [`uploader`] - Validates and sanitizes uploaded file names and stages uploads
//! - [`extractor`] - Unpacks a staged ZIP archive (or single XML document) for parsing
//! - [`workflow`] - Upload, extract, parse, write and cleanup steps chained together
//! - [`cli`] - Command-line interface for the workflow
//! - [`models`] - Invoice records, the row table and output options
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! The extraction core works on raw XML bytes and never touches the file system:
//!
//! ```no_run
//! use hoadon_cli::{errors::AppResult, parser};
//!
//! # fn example(documents: Vec<Vec<u8>>) -> AppResult<()> {
//! let table = parser::aggregate_sources(&documents)?;
//! println!("{} invoices found", table.len());
//! # Ok(())
//! # }
//! ```

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod extractor;
pub mod models;
pub mod parser;
pub mod ui;
pub mod uploader;
pub mod utils;
pub mod workflow;

use crate::constants::XLSX_SHEET_NAME;
use crate::errors::{AppError, AppResult};
use crate::models::{HeaderLanguage, OutputFormat, RowTable};
use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook};
use std::fs::{self as std_fs, File};
use std::path::Path;

/// Writes the table to `path` in the requested format.
///
/// One row per record and one column per field; missing values become empty
/// cells (xlsx, csv) or nulls (parquet). The header row is written even when
/// the table has no rows.
///
/// # Errors
///
/// Returns `IoError` if the parent directory cannot be created and `WriteError`
/// if serialization fails.
pub fn write_table(
    table: &RowTable,
    path: &Path,
    format: OutputFormat,
    language: HeaderLanguage,
) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std_fs::create_dir_all(parent).map_err(|e| {
            AppError::IoError(format!(
                "Failed to create output directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    match format {
        OutputFormat::Xlsx => write_xlsx(table, path, language),
        OutputFormat::Csv => {
            let mut df = table_to_dataframe(table, language)?;
            let mut file = create_file(path)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)
                .map_err(|e| AppError::WriteError(format!("Failed to write CSV file: {e}")))
        }
        OutputFormat::Parquet => {
            let mut df = table_to_dataframe(table, language)?;
            let mut file = create_file(path)?;
            ParquetWriter::new(&mut file)
                .finish(&mut df)
                .map(|_| ())
                .map_err(|e| AppError::WriteError(format!("Failed to write Parquet file: {e}")))
        }
    }
}

fn create_file(path: &Path) -> AppResult<File> {
    File::create(path).map_err(|e| {
        AppError::IoError(format!(
            "Failed to create output file {}: {e}",
            path.display()
        ))
    })
}

fn write_xlsx(table: &RowTable, path: &Path, language: HeaderLanguage) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(XLSX_SHEET_NAME)?;

    for (col, field) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col_index(col)?, field.label(language), &header_format)?;
    }

    for (row, record) in table.iter().enumerate() {
        let row = u32::try_from(row + 1)
            .map_err(|_| AppError::WriteError("Too many rows for a worksheet".into()))?;
        for (col, field) in table.columns().iter().enumerate() {
            if let Some(value) = record.get(*field) {
                worksheet.write_string(row, col_index(col)?, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn col_index(col: usize) -> AppResult<u16> {
    u16::try_from(col).map_err(|_| AppError::WriteError("Too many columns for a worksheet".into()))
}

/// Converts the table into a Polars DataFrame with one nullable string column per field.
fn table_to_dataframe(table: &RowTable, language: HeaderLanguage) -> AppResult<DataFrame> {
    let columns: Vec<Series> = table
        .columns()
        .iter()
        .map(|field| {
            let values: Vec<Option<&str>> = table.iter().map(|r| r.get(*field)).collect();
            Series::new(field.label(language), values)
        })
        .collect();

    DataFrame::new(columns)
        .map_err(|e| AppError::WriteError(format!("Failed to create DataFrame: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvoiceRecord;
    use tempfile::TempDir;

    fn sample_table() -> RowTable {
        RowTable::from(vec![
            InvoiceRecord {
                invoice_number: Some("AA/20E00000123".to_string()),
                tax_code: Some("0101234567".to_string()),
                settlement_value: Some("1100000".to_string()),
                disbursed_amount: Some("1100000".to_string()),
                ..InvoiceRecord::default()
            },
            InvoiceRecord {
                invoice_number: Some("AA/20E00000124".to_string()),
                ..InvoiceRecord::default()
            },
        ])
    }

    #[test]
    fn table_to_dataframe_empty_yields_zero_rows() {
        let df = table_to_dataframe(&RowTable::new(), HeaderLanguage::En).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 9);
    }

    #[test]
    fn table_to_dataframe_keeps_nulls() {
        let df = table_to_dataframe(&sample_table(), HeaderLanguage::En).unwrap();
        assert_eq!(df.height(), 2);
        let tax = df.column("Tax Code").unwrap();
        assert_eq!(tax.get(0).unwrap(), AnyValue::String("0101234567"));
        assert_eq!(tax.null_count(), 1);
    }

    #[test]
    fn table_to_dataframe_vietnamese_headers() {
        let df = table_to_dataframe(&sample_table(), HeaderLanguage::Vi).unwrap();
        assert!(df.column("Số tiền giải ngân").is_ok());
    }

    #[test]
    fn write_table_csv_renders_nulls_as_empty_cells() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/output.csv");

        write_table(&sample_table(), &path, OutputFormat::Csv, HeaderLanguage::En).unwrap();

        let contents = std_fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Invoice Type,Invoice/Customs-Declaration Number"));
        assert!(lines[2].starts_with(",AA/20E00000124,"));
    }

    #[test]
    fn write_table_xlsx_creates_workbook() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("output.xlsx");

        write_table(&sample_table(), &path, OutputFormat::Xlsx, HeaderLanguage::Vi).unwrap();

        let bytes = std_fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn write_table_parquet_round_trips_height() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("output.parquet");

        write_table(&sample_table(), &path, OutputFormat::Parquet, HeaderLanguage::En).unwrap();

        let file = File::open(&path).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 9);
    }
}

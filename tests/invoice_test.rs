//! Integration tests for invoice extraction and aggregation

#[path = "common/mod.rs"]
mod common;

use common::*;
use hoadon_cli::errors::AppError;
use hoadon_cli::models::{Field, Subtree};
use hoadon_cli::parser::{
    aggregate, aggregate_sources, aggregate_sources_lenient, aggregate_sources_par, extract,
    extract_bytes, parse_document,
};

#[test]
fn test_extract_full_invoice() {
    let records = extract_bytes(FULL_INVOICE_XML.as_bytes()).unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.get(Field::InvoiceType), Some("Hóa đơn giá trị gia tăng"));
    assert_eq!(record.get(Field::InvoiceNumber), Some("C24TAA1234"));
    assert_eq!(record.get(Field::InvoiceDate), Some("2024-03-15"));
    assert_eq!(record.get(Field::TaxCode), Some("0312345678"));
    assert_eq!(record.get(Field::BankAccountNumber), Some("0123456789"));
    assert_eq!(record.get(Field::BankName), Some("Vietcombank"));
    assert_eq!(record.get(Field::Beneficiary), Some("Công ty TNHH ABC"));
    assert_eq!(record.get(Field::SettlementValue), Some("1100000"));
    assert_eq!(record.get(Field::DisbursedAmount), Some("1100000"));
}

#[test]
fn test_extract_sparse_invoice_yields_missing_fields() {
    let records = extract_bytes(TWO_INVOICES_XML.as_bytes()).unwrap();
    assert_eq!(records.len(), 2);

    let sparse = &records[1];
    assert_eq!(sparse.get(Field::InvoiceNumber), Some("2"));
    assert_eq!(sparse.get(Field::InvoiceType), None);
    assert_eq!(sparse.get(Field::TaxCode), None);
    assert_eq!(sparse.get(Field::Beneficiary), None);
    assert_eq!(sparse.get(Field::BankAccountNumber), None);
    assert_eq!(sparse.get(Field::SettlementValue), Some("20"));
}

#[test]
fn test_extract_missing_subtree_is_structure_error() {
    let err = extract_bytes(MISSING_SETTLEMENT_XML.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        AppError::StructureError {
            subtree: Subtree::Settlement,
            position: 1
        }
    ));
}

#[test]
fn test_extract_document_without_invoices() {
    let document = parse_document(NO_INVOICES_XML.as_bytes()).unwrap();
    assert!(extract(&document).unwrap().is_empty());
}

#[test]
fn test_malformed_document_is_parse_error() {
    let err = extract_bytes(b"<HDon><DLHDon></HDon>").unwrap_err();
    assert!(matches!(err, AppError::ParseError(_)));
}

#[test]
fn test_aggregate_concatenates_in_document_order() {
    let documents = vec![
        parse_document(TWO_INVOICES_XML.as_bytes()).unwrap(),
        parse_document(NO_INVOICES_XML.as_bytes()).unwrap(),
        parse_document(FULL_INVOICE_XML.as_bytes()).unwrap(),
    ];

    let table = aggregate(&documents).unwrap();
    let numbers: Vec<_> = table
        .iter()
        .map(|r| r.get(Field::InvoiceNumber))
        .collect();
    assert_eq!(numbers, vec![Some("K11"), Some("2"), Some("C24TAA1234")]);
    assert_eq!(table.columns(), &Field::ALL);
}

#[test]
fn test_aggregate_empty_input_has_columns_but_no_rows() {
    let table = aggregate(&[]).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.columns().len(), 9);
}

#[test]
fn test_aggregate_fails_on_any_bad_document() {
    let sources = [FULL_INVOICE_XML, MISSING_SETTLEMENT_XML, TWO_INVOICES_XML];
    assert!(aggregate_sources(&sources).is_err());
    assert!(aggregate_sources_par(&sources).is_err());
}

#[test]
fn test_parallel_aggregation_matches_sequential() {
    let sources: Vec<&str> = (0..40)
        .map(|i| if i % 3 == 0 { FULL_INVOICE_XML } else { TWO_INVOICES_XML })
        .collect();

    let sequential = aggregate_sources(&sources).unwrap();
    let parallel = aggregate_sources_par(&sources).unwrap();
    assert_eq!(sequential.rows(), parallel.rows());
}

#[test]
fn test_lenient_aggregation_reports_failures_by_index() {
    let sources = [
        FULL_INVOICE_XML,
        "<broken",
        TWO_INVOICES_XML,
        MISSING_SETTLEMENT_XML,
    ];

    let report = aggregate_sources_lenient(&sources);
    assert_eq!(report.table.len(), 3);
    let indexes: Vec<_> = report.failures.iter().map(|f| f.index).collect();
    assert_eq!(indexes, vec![1, 3]);
}

#[test]
fn test_tax_code_ignores_summary_when_seller_has_none() {
    let xml = FULL_INVOICE_XML.replace("<MST>0312345678</MST>", "");
    let records = extract_bytes(xml.as_bytes()).unwrap();
    assert_eq!(records[0].get(Field::TaxCode), None);
    assert_eq!(records[0].get(Field::Beneficiary), Some("Công ty TNHH ABC"));
}

use super::xml_tree::{parse_document, XmlElement};
use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::{InvoiceRecord, Subtree};

/// Extracts one `InvoiceRecord` per invoice element found directly under the root.
///
/// The search is flat: invoice elements nested deeper in the tree are not found.
/// Records come back in document order.
///
/// # Errors
///
/// Returns `StructureError` for the first invoice element that lacks one of the
/// structural subtrees (general-information, detail/content, seller-party or
/// settlement). Missing leaf elements never fail; they produce `None` fields.
pub fn extract(document: &XmlElement) -> AppResult<Vec<InvoiceRecord>> {
    document
        .children_named(INVOICE_ELEMENT)
        .enumerate()
        .map(|(index, invoice)| extract_record(invoice, index + 1))
        .collect()
}

/// Parses raw XML bytes and extracts their records. The tree is dropped afterwards.
pub fn extract_bytes(content: &[u8]) -> AppResult<Vec<InvoiceRecord>> {
    let document = parse_document(content)?;
    extract(&document)
}

fn extract_record(invoice: &XmlElement, position: usize) -> AppResult<InvoiceRecord> {
    let general = subtree(invoice, Subtree::GeneralInformation, position)?;
    let detail = subtree(invoice, Subtree::DetailContent, position)?;
    let seller = subtree(detail, Subtree::SellerParty, position)?;
    let settlement = subtree(detail, Subtree::Settlement, position)?;

    let bank = BankDetails::from_side_list(general.child(OTHER_INFO));
    let amount = owned(settlement.child_text(SETTLEMENT_TOTAL));

    Ok(InvoiceRecord {
        invoice_type: owned(general.child_text(INVOICE_TYPE)),
        invoice_number: combine_number(
            general.child_text(SERIES_ID),
            general.child_text(SEQUENCE_NUMBER),
        ),
        invoice_date: owned(general.child_text(ISSUE_DATE)),
        // The seller-party value replaces the summary MSTTCGP outright, even when absent
        tax_code: owned(seller.child_text(SELLER_TAX_CODE)),
        bank_account_number: bank.account_number,
        bank_name: bank.bank_name,
        beneficiary: owned(seller.child_text(SELLER_NAME)),
        settlement_value: amount.clone(),
        disbursed_amount: amount,
    })
}

fn subtree<'a>(
    parent: &'a XmlElement,
    subtree: Subtree,
    position: usize,
) -> AppResult<&'a XmlElement> {
    parent
        .child(subtree.element_name())
        .ok_or(AppError::StructureError { subtree, position })
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

/// Joins series identifier and sequence number with no separator.
///
/// A missing half is treated as empty; only when both are missing is the
/// number itself missing.
fn combine_number(series: Option<&str>, sequence: Option<&str>) -> Option<String> {
    match (series, sequence) {
        (None, None) => None,
        (series, sequence) => Some(format!(
            "{}{}",
            series.unwrap_or_default(),
            sequence.unwrap_or_default()
        )),
    }
}

#[derive(Debug, Default)]
struct BankDetails {
    account_number: Option<String>,
    bank_name: Option<String>,
}

impl BankDetails {
    /// Scans `TTin` entries of the side-list; later entries overwrite earlier ones.
    fn from_side_list(side_list: Option<&XmlElement>) -> Self {
        let mut details = Self::default();
        let entries = side_list
            .into_iter()
            .flat_map(|list| list.children_named(OTHER_INFO_ENTRY));

        for entry in entries {
            let value = owned(entry.child_text(OTHER_INFO_VALUE));
            match entry.child_text(OTHER_INFO_NAME) {
                Some(BANK_ACCOUNT_KEY) => details.account_number = value,
                Some(BANK_NAME_KEY) => details.bank_name = value,
                _ => {}
            }
        }
        details
    }
}

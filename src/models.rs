use crate::constants::*;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Structural subtrees an invoice element must contain.
///
/// Absence of any of these is an error, unlike leaf elements which simply
/// yield an empty field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtree {
    GeneralInformation,
    DetailContent,
    SellerParty,
    Settlement,
}

impl Subtree {
    /// Element name of the subtree in the invoice schema.
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::GeneralInformation => GENERAL_INFO,
            Self::DetailContent => DETAIL_CONTENT,
            Self::SellerParty => SELLER_PARTY,
            Self::Settlement => SETTLEMENT,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::GeneralInformation => "general-information",
            Self::DetailContent => "detail/content",
            Self::SellerParty => "seller-party",
            Self::Settlement => "settlement",
        }
    }
}

impl fmt::Display for Subtree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.element_name())
    }
}

/// Language used for spreadsheet column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderLanguage {
    #[default]
    En,
    Vi,
}

impl FromStr for HeaderLanguage {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "vi" | "vietnamese" => Ok(Self::Vi),
            other => Err(format!("unknown header language '{other}'")),
        }
    }
}

/// File format written by the table writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// The closed set of columns produced for every invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    InvoiceType,
    InvoiceNumber,
    InvoiceDate,
    TaxCode,
    BankAccountNumber,
    BankName,
    Beneficiary,
    SettlementValue,
    DisbursedAmount,
}

impl Field {
    /// All fields in column order.
    pub const ALL: [Field; 9] = [
        Field::InvoiceType,
        Field::InvoiceNumber,
        Field::InvoiceDate,
        Field::TaxCode,
        Field::BankAccountNumber,
        Field::BankName,
        Field::Beneficiary,
        Field::SettlementValue,
        Field::DisbursedAmount,
    ];

    pub fn label(&self, language: HeaderLanguage) -> &'static str {
        match language {
            HeaderLanguage::En => match self {
                Self::InvoiceType => "Invoice Type",
                Self::InvoiceNumber => "Invoice/Customs-Declaration Number",
                Self::InvoiceDate => "Invoice/Declaration Date",
                Self::TaxCode => "Tax Code",
                Self::BankAccountNumber => "Bank Account Number",
                Self::BankName => "Bank Name",
                Self::Beneficiary => "Beneficiary",
                Self::SettlementValue => "Settlement Value",
                Self::DisbursedAmount => "Disbursed Amount",
            },
            HeaderLanguage::Vi => match self {
                Self::InvoiceType => "Loại Hóa Đơn",
                Self::InvoiceNumber => "Số hoá đơn/Tờ khai Hải quan điện tử",
                Self::InvoiceDate => "Ngày hóa đơn/ Tờ khai Hải quan điện tử",
                Self::TaxCode => "Mã số thuế",
                Self::BankAccountNumber => "Số tài khoản",
                Self::BankName => "Tại Ngân hàng",
                Self::Beneficiary => "Người thụ hưởng",
                Self::SettlementValue => "Giá trị theo hoá đơn/Tờ khai Hải quan điện tử",
                Self::DisbursedAmount => "Số tiền giải ngân",
            },
        }
    }
}

/// One row of the output table, built from a single invoice element.
///
/// Every field is always present; `None` marks a value missing from the source XML.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvoiceRecord {
    pub invoice_type: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub tax_code: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_name: Option<String>,
    pub beneficiary: Option<String>,
    pub settlement_value: Option<String>,
    /// Same source element as `settlement_value`; the schema has no separate disbursement total.
    pub disbursed_amount: Option<String>,
}

impl InvoiceRecord {
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::InvoiceType => &self.invoice_type,
            Field::InvoiceNumber => &self.invoice_number,
            Field::InvoiceDate => &self.invoice_date,
            Field::TaxCode => &self.tax_code,
            Field::BankAccountNumber => &self.bank_account_number,
            Field::BankName => &self.bank_name,
            Field::Beneficiary => &self.beneficiary,
            Field::SettlementValue => &self.settlement_value,
            Field::DisbursedAmount => &self.disbursed_amount,
        };
        value.as_deref()
    }

    /// Iterates `(field, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, Option<&str>)> + '_ {
        Field::ALL.iter().map(move |field| (*field, self.get(*field)))
    }
}

/// Ordered rows handed to the table writer.
///
/// Row order is document discovery order, then invoice element order within a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowTable {
    rows: Vec<InvoiceRecord>,
}

impl RowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns of the table. Every record carries the full field set, so the
    /// union of keys across records is always the fixed column order.
    pub fn columns(&self) -> &'static [Field] {
        &Field::ALL
    }

    /// Appends a document's records after everything already in the table.
    pub fn append(&mut self, records: Vec<InvoiceRecord>) {
        self.rows.extend(records);
    }

    pub fn rows(&self) -> &[InvoiceRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InvoiceRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<InvoiceRecord> {
        self.rows
    }
}

impl From<Vec<InvoiceRecord>> for RowTable {
    fn from(rows: Vec<InvoiceRecord>) -> Self {
        Self { rows }
    }
}

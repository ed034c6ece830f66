// Invoice schema element names
pub const INVOICE_ELEMENT: &str = "DLHDon";
pub const GENERAL_INFO: &str = "TTChung";
pub const INVOICE_TYPE: &str = "THDon";
pub const SERIES_ID: &str = "KHHDon";
pub const SEQUENCE_NUMBER: &str = "SHDon";
pub const ISSUE_DATE: &str = "NLap";
pub const OTHER_INFO: &str = "TTKhac";
pub const OTHER_INFO_ENTRY: &str = "TTin";
pub const OTHER_INFO_NAME: &str = "TTruong";
pub const OTHER_INFO_VALUE: &str = "DLieu";
pub const DETAIL_CONTENT: &str = "NDHDon";
pub const SELLER_PARTY: &str = "NBan";
pub const SELLER_NAME: &str = "Ten";
pub const SELLER_TAX_CODE: &str = "MST";
pub const SETTLEMENT: &str = "TToan";
pub const SETTLEMENT_TOTAL: &str = "TgTTTBSo";

// Side-list keys carrying bank details
pub const BANK_ACCOUNT_KEY: &str = "BankAccount";
pub const BANK_NAME_KEY: &str = "BankName";

// Upload handling
pub const ALLOWED_EXTENSIONS: &[&str] = &["zip", "xml"];
pub const FILENAME_STRIP_PATTERN: &str = r"[^A-Za-z0-9_.-]";
pub const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM0", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
    "COM8", "COM9", "LPT0", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8",
    "LPT9",
];

// Default locations
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_EXTRACT_DIR_NAME: &str = "extracted";
pub const DEFAULT_OUTPUT_STEM: &str = "output";
pub const XLSX_SHEET_NAME: &str = "Sheet1";

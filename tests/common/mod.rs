//! Common test utilities for integration tests

use std::fs;
use std::io::Write;
use std::path::Path;

/// Helper function to create a test XML file in a directory
#[allow(dead_code)]
pub fn create_test_xml_file(path: &Path, content: &str) {
    let parent = path.parent().unwrap();
    fs::create_dir_all(parent).unwrap();
    fs::File::create(path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
}

/// Helper function to create a test ZIP file with specified files
#[allow(dead_code)]
pub fn create_test_zip(
    zip_path: &Path,
    files: &[(&str, &str)],
) -> Result<(), Box<dyn std::error::Error>> {
    use zip::write::FileOptions;
    use zip::ZipWriter;

    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in files {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

/// Invoice document with every field populated
#[allow(dead_code)]
pub const FULL_INVOICE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HDon>
  <DLHDon Id="data">
    <TTChung>
      <THDon>Hóa đơn giá trị gia tăng</THDon>
      <KHHDon>C24TAA</KHHDon>
      <SHDon>1234</SHDon>
      <NLap>2024-03-15</NLap>
      <MSTTCGP>0101010101</MSTTCGP>
      <TTKhac>
        <TTin>
          <TTruong>BankAccount</TTruong>
          <KDLieu>string</KDLieu>
          <DLieu>0123456789</DLieu>
        </TTin>
        <TTin>
          <TTruong>BankName</TTruong>
          <KDLieu>string</KDLieu>
          <DLieu>Vietcombank</DLieu>
        </TTin>
      </TTKhac>
    </TTChung>
    <NDHDon>
      <NBan>
        <Ten>Công ty TNHH ABC</Ten>
        <MST>0312345678</MST>
      </NBan>
      <NMua>
        <Ten>Công ty XYZ</Ten>
      </NMua>
      <TToan>
        <TgTTTBSo>1100000</TgTTTBSo>
      </TToan>
    </NDHDon>
  </DLHDon>
</HDon>"#;

/// Two invoices in one document; the second has only a number and amount
#[allow(dead_code)]
pub const TWO_INVOICES_XML: &str = r#"<HDon>
  <DLHDon>
    <TTChung><THDon>A</THDon><KHHDon>K1</KHHDon><SHDon>1</SHDon></TTChung>
    <NDHDon><NBan><MST>111</MST></NBan><TToan><TgTTTBSo>10</TgTTTBSo></TToan></NDHDon>
  </DLHDon>
  <DLHDon>
    <TTChung><SHDon>2</SHDon></TTChung>
    <NDHDon><NBan/><TToan><TgTTTBSo>20</TgTTTBSo></TToan></NDHDon>
  </DLHDon>
</HDon>"#;

/// Invoice element without its settlement subtree
#[allow(dead_code)]
pub const MISSING_SETTLEMENT_XML: &str = r#"<HDon>
  <DLHDon>
    <TTChung><SHDon>9</SHDon></TTChung>
    <NDHDon><NBan><Ten>Seller</Ten></NBan></NDHDon>
  </DLHDon>
</HDon>"#;

/// Document with no invoice elements
#[allow(dead_code)]
pub const NO_INVOICES_XML: &str = r#"<?xml version="1.0"?>
<HDon><DSCKS/></HDon>"#;

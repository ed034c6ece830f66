mod aggregate;
mod file_finder;
mod invoice;
mod pipeline;
mod table_writer;
mod xml_tree;

// Re-export public API
pub use aggregate::{
    aggregate, aggregate_sources, aggregate_sources_lenient, aggregate_sources_par,
    try_aggregate_sources_par, AggregateReport, DocumentFailure,
};
pub use file_finder::find_xmls;
pub use invoice::{extract, extract_bytes};
pub use pipeline::process_directory;
pub use table_writer::write_table;
pub use xml_tree::{parse_document, XmlElement};

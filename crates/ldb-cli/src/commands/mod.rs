//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod types;

use std::fs;
use std::path::Path;

use ldb_core::{
    extract_document_text, DocumentType, ExtractedRecord, LdbConfig, TableExporter, TableRow,
};

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used when writing this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// clap value parser for `--type`.
pub fn parse_document_type(value: &str) -> Result<DocumentType, String> {
    value.parse().map_err(|e: ldb_core::ExtractionError| e.to_string())
}

/// Load the configuration file if one was given, defaults otherwise.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LdbConfig> {
    match config_path {
        Some(path) => Ok(LdbConfig::from_file(Path::new(path))?),
        None => Ok(LdbConfig::default()),
    }
}

/// Read a document's plain text: PDFs go through the PDF text source,
/// `.txt` files are read as is.
pub fn read_document_text(path: &Path, config: &LdbConfig) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            Ok(extract_document_text(&data, &config.pdf)?)
        }
        "txt" => Ok(fs::read_to_string(path)?),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Render a record in the requested format.
pub fn format_record(
    record: &ExtractedRecord,
    document_type: DocumentType,
    filename: &str,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let exporter = TableExporter::new(document_type);
            Ok(exporter.to_csv_string(&[TableRow { filename, record }])?)
        }
        OutputFormat::Text => Ok(format_text(record, filename)),
    }
}

fn format_text(record: &ExtractedRecord, filename: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", filename));
    output.push_str(&format!("Document type: {}\n", record.document_type()));

    if let Some(error) = record.error() {
        output.push_str(&format!("Error: {}\n", error));
        return output;
    }

    output.push('\n');
    let width = record
        .fields()
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0);
    for field in record.fields() {
        output.push_str(&format!(
            "  {:width$}  {}\n",
            field.name,
            field.value.as_deref().unwrap_or("-"),
            width = width
        ));
    }

    output
}

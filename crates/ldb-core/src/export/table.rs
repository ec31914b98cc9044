//! Fixed-column tabular export of extracted records.

use std::io::Write;

use crate::error::{LdbError, Result};
use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;

/// Cell content for a null field.
pub const MISSING_VALUE: &str = "-";

/// One processed file.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    pub filename: &'a str,
    pub record: &'a ExtractedRecord,
}

/// Writes records of one document type as CSV.
///
/// Columns are `No`, `filename`, the type's expected fields in order and
/// `error`, so every row has the same shape whatever was extracted.
#[derive(Debug, Clone, Copy)]
pub struct TableExporter {
    document_type: DocumentType,
}

impl TableExporter {
    pub fn new(document_type: DocumentType) -> Self {
        Self { document_type }
    }

    /// Header row.
    pub fn headers(&self) -> Vec<&'static str> {
        let fields = self.document_type.expected_fields();
        let mut headers = Vec::with_capacity(fields.len() + 3);
        headers.push("No");
        headers.push("filename");
        headers.extend_from_slice(fields);
        headers.push("error");
        headers
    }

    /// Cells for one record; `number` is 1-based.
    pub fn cells(&self, number: usize, row: &TableRow<'_>) -> Vec<String> {
        let mut cells = vec![number.to_string(), row.filename.to_string()];
        cells.extend(
            self.document_type
                .expected_fields()
                .iter()
                .map(|field| row.record.get(field).unwrap_or(MISSING_VALUE).to_string()),
        );
        cells.push(row.record.error().unwrap_or(MISSING_VALUE).to_string());
        cells
    }

    /// Write the table to `writer`.
    pub fn write<W: Write>(&self, writer: W, rows: &[TableRow<'_>]) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.headers())?;
        for (index, row) in rows.iter().enumerate() {
            wtr.write_record(self.cells(index + 1, row))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Render the table as a CSV string.
    pub fn to_csv_string(&self, rows: &[TableRow<'_>]) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, rows)?;
        String::from_utf8(buffer).map_err(|e| LdbError::Config(format!("non UTF-8 CSV output: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::extract_document_data;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_headers_follow_field_order() {
        let exporter = TableExporter::new(DocumentType::Evln);
        assert_eq!(
            exporter.headers(),
            vec![
                "No",
                "filename",
                "Name",
                "Place of Birth",
                "Date of Birth",
                "Passport No",
                "Passport Expiry",
                "Date Issue",
                "error"
            ]
        );
    }

    #[test]
    fn test_csv_output() {
        let ok = extract_document_data("Passport No : EA1234567", "EVLN");
        let failed = ExtractedRecord::failed("EVLN", "failed to extract EVLN document: boom");
        let rows = [
            TableRow { filename: "a.pdf", record: &ok },
            TableRow { filename: "b.pdf", record: &failed },
        ];

        let csv = TableExporter::new(DocumentType::Evln).to_csv_string(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,a.pdf,-,-,-,EA1234567,-,-,-");
        assert_eq!(lines[2], "2,b.pdf,-,-,-,-,-,-,failed to extract EVLN document: boom");
    }
}

//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the ldb pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdbConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF text source configuration.
    pub pdf: PdfConfig,

    /// Output naming configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Earliest year accepted by the EVLN last-resort issue date scan.
    pub issue_year_min: i32,

    /// Latest year accepted by the EVLN last-resort issue date scan.
    pub issue_year_max: i32,

    /// Texts longer than this are rejected with an error record.
    pub max_text_bytes: usize,

    /// Attach validation reports to results.
    pub validate: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            issue_year_min: 2020,
            issue_year_max: 2025,
            max_text_bytes: 4 * 1024 * 1024,
            validate: true,
        }
    }
}

/// PDF text source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum accepted input file size in bytes.
    pub max_file_size: u64,

    /// Minimum extracted text length to treat a PDF as text-bearing.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            min_text_length: 1,
        }
    }
}

/// Output file naming configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Include the holder's name in generated file names.
    pub use_name: bool,

    /// Include the passport number in generated file names.
    pub use_passport: bool,

    /// Maximum generated file name length, extension included.
    pub max_filename_len: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_name: true,
            use_passport: true,
            max_filename_len: 100,
        }
    }
}

impl LdbConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

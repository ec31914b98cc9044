//! Extract command - pull fields from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ldb_core::{validate, DocumentParser, DocumentType};

use super::{format_record, load_config, parse_document_type, read_document_text, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Document type (SKTT, EVLN, ITAS, ITK, NOTIFICATION, DKPTKA)
    #[arg(short = 't', long = "type", value_parser = parse_document_type)]
    document_type: DocumentType,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    pb.set_message("Reading text...");
    let text = read_document_text(&args.input, &config)?;
    debug!("Read {} bytes of text", text.len());

    pb.set_message(format!("Extracting {} fields...", args.document_type));
    let parser = DocumentParser::with_config(&config.extraction);
    let record = parser.extract_typed(&text, args.document_type);

    pb.finish_and_clear();

    if let Some(error) = record.error() {
        eprintln!("{} {}", style("✗").red(), error);
    }

    if args.validate {
        let report = validate(&record);
        eprintln!(
            "{} {}",
            style("Validation:").yellow(),
            report.status.as_str()
        );
        if !report.missing_fields.is_empty() {
            eprintln!(
                "  Missing required fields: {}",
                report.missing_fields.join(", ")
            );
        }
        for warning in &report.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let filename = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let output = format_record(&record, args.document_type, filename, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

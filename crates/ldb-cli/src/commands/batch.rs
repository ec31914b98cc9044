//! Batch processing command for multiple documents.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use ldb_core::{
    generate_filename, validate, DocumentParser, DocumentType, ExtractedRecord,
    ExtractionLogEntry, FilenameOptions, LdbConfig, TableExporter, TableRow,
};

use super::{format_record, load_config, parse_document_type, read_document_text, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Document type shared by every input
    #[arg(short = 't', long = "type", value_parser = parse_document_type)]
    document_type: DocumentType,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write a summary table (summary.csv)
    #[arg(long)]
    summary: bool,

    /// Copy inputs under names built from the extracted holder
    #[arg(long)]
    rename: bool,

    /// Append one JSON line per file to this log
    #[arg(long)]
    log: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    file_size: u64,
    record: ExtractedRecord,
    processing_time_ms: u64,
}

impl FileResult {
    fn filename(&self) -> &str {
        self.path.file_name().and_then(|s| s.to_str()).unwrap_or("")
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(DocumentParser::with_config(&config.extraction));
    let document_type = args.document_type;

    // Workers run on the blocking pool; `buffered` keeps input order.
    let results: Vec<FileResult> = stream::iter(files)
        .map(|path| {
            let parser = Arc::clone(&parser);
            let config = Arc::clone(&config);
            let pb = pb.clone();
            async move {
                let fallback = path.clone();
                let result = tokio::task::spawn_blocking(move || {
                    process_file(path, document_type, &parser, &config)
                })
                .await
                .unwrap_or_else(|e| FileResult {
                    path: fallback,
                    file_size: 0,
                    record: ExtractedRecord::failed(
                        document_type.as_str(),
                        format!("worker failed: {}", e),
                    ),
                    processing_time_ms: 0,
                });
                pb.inc(1);
                result
            }
        })
        .buffered(args.jobs.max(1))
        .collect()
        .await;

    pb.finish_and_clear();

    if let Some(ref output_dir) = args.output_dir {
        for result in &results {
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));
            let content =
                format_record(&result.record, document_type, result.filename(), args.format)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, document_type, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if args.rename {
        let options = FilenameOptions::from(&config.output);
        let renamed = copy_renamed(&results, args.output_dir.as_deref(), &options)?;
        println!("{} Copied {} renamed files", style("✓").green(), renamed);
    }

    if let Some(ref log_path) = args.log {
        append_log(log_path, &results)?;
        println!(
            "{} Log appended to {}",
            style("✓").green(),
            log_path.display()
        );
    }

    let failed: Vec<&FileResult> = results.iter().filter(|r| r.record.is_error()).collect();
    let successful = results.len() - failed.len();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if config.extraction.validate {
        print_incomplete(&results);
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.record.error().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Read and extract one file. Failures become error records.
fn process_file(
    path: PathBuf,
    document_type: DocumentType,
    parser: &DocumentParser,
    config: &LdbConfig,
) -> FileResult {
    let start = Instant::now();
    let file_size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

    let record = match read_document_text(&path, config) {
        Ok(text) => parser.extract_typed(&text, document_type),
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            ExtractedRecord::failed(
                document_type.as_str(),
                format!("failed to read {}: {}", path.display(), e),
            )
        }
    };

    FileResult {
        path,
        file_size,
        record,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

fn write_summary(
    path: &Path,
    document_type: DocumentType,
    results: &[FileResult],
) -> anyhow::Result<()> {
    let rows: Vec<TableRow<'_>> = results
        .iter()
        .map(|r| TableRow {
            filename: r.filename(),
            record: &r.record,
        })
        .collect();

    let file = fs::File::create(path)?;
    TableExporter::new(document_type).write(file, &rows)?;
    Ok(())
}

/// Copy every successfully extracted file under its generated name.
///
/// Copies land in `output_dir` when given, next to the source otherwise.
/// Existing files are never overwritten; a counter is appended instead.
fn copy_renamed(
    results: &[FileResult],
    output_dir: Option<&Path>,
    options: &FilenameOptions,
) -> anyhow::Result<usize> {
    let mut copied = 0;

    for result in results.iter().filter(|r| !r.record.is_error()) {
        let name = generate_filename(&result.record, result.filename(), options);
        let dir = output_dir
            .or_else(|| result.path.parent())
            .unwrap_or_else(|| Path::new("."));
        let target = dir.join(&name);
        if target == result.path {
            continue;
        }
        let target = unique_path(&target);

        fs::copy(&result.path, &target)?;
        debug!("Copied {} to {}", result.path.display(), target.display());
        copied += 1;
    }

    Ok(copied)
}

fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    (2..)
        .map(|n| path.with_file_name(format!("{}_{}{}", stem, n, extension)))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

fn append_log(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    for result in results {
        let entry = ExtractionLogEntry::new(
            result.filename(),
            result.file_size,
            &result.record,
            result.processing_time_ms,
            Utc::now(),
        )?;
        writeln!(file, "{}", entry.to_json_line()?)?;
    }

    Ok(())
}

fn print_incomplete(results: &[FileResult]) {
    let incomplete: Vec<(&FileResult, Vec<String>)> = results
        .iter()
        .filter(|r| !r.record.is_error())
        .map(|r| (r, validate(&r.record).missing_fields))
        .filter(|(_, missing)| !missing.is_empty())
        .collect();

    if incomplete.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Incomplete records:").yellow());
    for (result, missing) in incomplete {
        println!("  - {}: missing {}", result.path.display(), missing.join(", "));
    }
}

//! Process command - extract fields from invoice files into one spreadsheet.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invex_core::{CsvSerializer, InvoiceWorkflow, XlsxSerializer, create_extractor};

use super::{format_outcome, load_config, upload_path, write_artifact, write_file};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input files or glob patterns (PNG/JPEG images, or .txt with recognized text)
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output file (default: configured export file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "xlsx")]
    format: OutputFormat,

    /// Print the raw extracted text of each input
    #[arg(long)]
    show_text: bool,

    /// Print per-field match summaries
    #[arg(long)]
    show_matches: bool,

    /// Skip inputs that fail instead of aborting
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Excel workbook
    Xlsx,
    /// CSV file
    Csv,
    /// JSON array (stdout unless --output is set)
    Json,
    /// Plain text table (stdout unless --output is set)
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.inputs.join(" "));
    }

    let extractor = create_extractor(&config.ocr)?;
    let mut workflow = InvoiceWorkflow::new(extractor);
    debug!("Using OCR engine: {}", workflow.engine_name());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    // JSON and text tables on stdout must stay parseable
    let status_to_stderr =
        matches!(args.format, OutputFormat::Json | OutputFormat::Text) && args.output.is_none();

    let mut failed = Vec::new();

    for path in &files {
        pb.set_message(path.display().to_string());

        match upload_path(&mut workflow, path) {
            Ok(outcome) => {
                let status = format_outcome(path, &outcome, args.show_text, args.show_matches);
                pb.suspend(|| {
                    if status_to_stderr {
                        eprint!("{}", status);
                    } else {
                        print!("{}", status);
                    }
                });
            }
            Err(e) if args.continue_on_error => {
                warn!("Failed to process {}: {:#}", path.display(), e);
                failed.push((path.clone(), e.to_string()));
            }
            Err(e) => {
                pb.abandon();
                error!("Failed to process {}: {:#}", path.display(), e);
                anyhow::bail!("Processing {} failed: {:#}", path.display(), e);
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let session = workflow.session();

    match args.format {
        OutputFormat::Xlsx => {
            let artifact = workflow.export(&XlsxSerializer::from_config(&config.export))?;
            let path = args.output.clone().unwrap_or_else(|| PathBuf::from(&artifact.file_name));
            write_artifact(&artifact, &path)?;
            println!(
                "{} Wrote {} records to {}",
                style("✓").green(),
                session.len(),
                path.display()
            );
        }
        OutputFormat::Csv => {
            let csv_name = PathBuf::from(&config.export.file_name).with_extension("csv");
            let serializer = CsvSerializer::with_file_name(csv_name.to_string_lossy());
            let artifact = workflow.export(&serializer)?;
            let path = args.output.clone().unwrap_or_else(|| PathBuf::from(&artifact.file_name));
            write_artifact(&artifact, &path)?;
            println!(
                "{} Wrote {} records to {}",
                style("✓").green(),
                session.len(),
                path.display()
            );
        }
        OutputFormat::Json | OutputFormat::Text => {
            let table = session.table();
            let content = match args.format {
                OutputFormat::Json => table.to_json()?,
                _ => table.render_text(),
            };

            if let Some(path) = &args.output {
                write_file(path, content.as_bytes())?;
                println!("{} Output written to {}", style("✓").green(), path.display());
            } else {
                println!("{}", content.trim_end());
            }
        }
    }

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            eprintln!("  - {}: {}", path.display(), error);
        }
    }

    debug!(
        "Processed {} files ({} failed) in {:?}",
        files.len(),
        failed.len(),
        start.elapsed()
    );

    Ok(())
}

/// Expand glob patterns; plain paths are kept as given, in order.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.contains(['*', '?', '[']) {
            files.push(PathBuf::from(input));
            continue;
        }

        let mut matched: Vec<PathBuf> = glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        matched.sort();

        if matched.is_empty() {
            warn!("No files match pattern: {}", input);
        }
        files.extend(matched);
    }

    Ok(files)
}

//! Session command - interactive uploads from stdin.
//!
//! Each line names a file to upload. After every successful upload the
//! accumulated table is printed and the spreadsheet is rewritten. A failed
//! upload or save is reported and the session carries on.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{info, warn};

use invex_core::{InvoiceWorkflow, TableSerializer, XlsxSerializer, create_extractor};

use super::{format_outcome, load_config, upload_path, write_artifact};

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    /// Spreadsheet rewritten after each upload (default: configured export file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the raw extracted text of each upload
    #[arg(long)]
    show_text: bool,

    /// Print per-field match summaries
    #[arg(long)]
    show_matches: bool,
}

pub fn run(args: SessionArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let serializer = XlsxSerializer::from_config(&config.export);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(serializer.file_name()));

    let mut workflow = InvoiceWorkflow::new(create_extractor(&config.ocr)?);
    info!("Session started with OCR engine {}", workflow.engine_name());

    println!(
        "{} Enter image paths one per line; 'quit' or EOF ends the session.",
        style("ℹ").blue()
    );

    let stdin = io::stdin();
    prompt()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim().trim_matches(|c| c == '"' || c == '\'');

        if input.is_empty() {
            prompt()?;
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }

        let path = Path::new(input);
        match upload_path(&mut workflow, path) {
            Ok(outcome) => {
                print!("{}", format_outcome(path, &outcome, args.show_text, args.show_matches));
                println!();
                println!("{}", style("Extracted Data:").bold());
                println!("{}", workflow.session().table().render_text());

                let saved = workflow
                    .export(&serializer)
                    .map_err(anyhow::Error::from)
                    .and_then(|artifact| write_artifact(&artifact, &output));
                match saved {
                    Ok(()) => println!(
                        "{} Saved {} records to {}",
                        style("✓").green(),
                        workflow.session().len(),
                        output.display()
                    ),
                    Err(e) => {
                        warn!("Failed to save {}: {:#}", output.display(), e);
                        eprintln!("{} {}: {:#}", style("✗").red(), output.display(), e);
                    }
                }
            }
            Err(e) => {
                eprintln!("{} {}: {:#}", style("✗").red(), path.display(), e);
            }
        }

        prompt()?;
    }

    println!();
    println!(
        "{} Session ended with {} records",
        style("ℹ").blue(),
        workflow.session().len()
    );

    Ok(())
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

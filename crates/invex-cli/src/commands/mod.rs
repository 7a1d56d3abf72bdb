//! Subcommands and the helpers they share.

pub mod config;
pub mod process;
pub mod session;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use tempfile::NamedTempFile;
use tracing::debug;

use invex_core::extract::ExtractionReport;
use invex_core::models::record::Field;
use invex_core::{ExportArtifact, InvexConfig, InvoiceWorkflow, TextExtractor, UploadOutcome};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invex")
        .join("config.json")
}

/// Load the configuration from `--config`, the default file if present, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvexConfig> {
    if let Some(path) = config_path {
        return Ok(InvexConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(InvexConfig::from_file(&default_path)?)
    } else {
        Ok(InvexConfig::default())
    }
}

/// Upload one file into the workflow.
///
/// PNG and JPEG files go through image decoding and OCR, `.txt` files are
/// taken as already-recognized text. Other extensions are rejected.
pub fn upload_path<T: TextExtractor>(
    workflow: &mut InvoiceWorkflow<T>,
    path: &Path,
) -> anyhow::Result<UploadOutcome> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let outcome = match extension.as_str() {
        "png" | "jpg" | "jpeg" => {
            let bytes = fs::read(path)?;
            workflow.upload(&bytes)?
        }
        "txt" => {
            let text = fs::read_to_string(path)?;
            workflow.upload_text(text)
        }
        _ => anyhow::bail!("Unsupported input type: {}", path.display()),
    };

    debug!(
        "Processed {} in {}ms",
        path.display(),
        outcome.processing_time_ms
    );

    Ok(outcome)
}

/// Status line plus the raw text and match summaries requested for one upload.
pub fn format_outcome(
    path: &Path,
    outcome: &UploadOutcome,
    show_text: bool,
    show_matches: bool,
) -> String {
    let mut out = format!(
        "{} {} ({}/{} fields)\n",
        style("✓").green(),
        path.display(),
        outcome.report.found_count(),
        Field::ALL.len()
    );

    if show_text {
        out.push_str(&format!("{}\n", style("Extracted Text:").bold()));
        out.push_str(&format!("{}\n\n", outcome.text.trim_end()));
    }

    if show_matches {
        push_matches(&mut out, &outcome.report);
    }

    out
}

fn push_matches(out: &mut String, report: &ExtractionReport) {
    for field in Field::ALL {
        out.push_str(&format!("  {} Match: {}\n", field, report.match_summary(field)));
    }
}

/// Write an exported file, creating parent directories as needed.
pub fn write_artifact(artifact: &ExportArtifact, path: &Path) -> anyhow::Result<()> {
    write_file(path, &artifact.bytes)?;
    debug!(
        "Wrote {} bytes ({}) to {}",
        artifact.bytes.len(),
        artifact.mime_type,
        path.display()
    );
    Ok(())
}

/// Replace `path` with `bytes`.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed over `path`, so a failed write never leaves a truncated file.
pub fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            parent
        }
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

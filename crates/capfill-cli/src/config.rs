//! Run configuration: validated inputs built once at startup and passed
//! through the pipeline, with no ambient globals.

use std::path::{Path, PathBuf};

use anyhow::bail;
use chrono::Local;
use tracing::{info, warn};

/// Everything a single fill run needs, validated before any I/O.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub identifier: String,
    pub record_variable: String,
    pub template: PathBuf,
    pub output: PathBuf,
    pub secrets: PathBuf,
}

/// Validate the raw arguments into a [`RunConfig`].
///
/// Fails before any file or network I/O on: a template path without a
/// `.pdf` extension, a missing template file, or identical template and
/// output paths. A non-`.pdf` output path only warns.
pub fn build(
    identifier: String,
    record_variable: String,
    input_pdf: String,
    output_pdf: Option<String>,
    secrets: PathBuf,
) -> anyhow::Result<RunConfig> {
    if !input_pdf.ends_with(".pdf") {
        bail!("template PDF must have a '.pdf' extension: {input_pdf}");
    }

    let template = PathBuf::from(&input_pdf);
    if !template.exists() {
        bail!("template PDF does not exist: {input_pdf}");
    }

    let output = match output_pdf {
        Some(path) => {
            if !path.ends_with(".pdf") {
                warn!(
                    path = %path,
                    "output PDF does not have a '.pdf' extension; the file may be awkward to open"
                );
            }
            PathBuf::from(path)
        }
        None => {
            let path = default_output_path(&template, &identifier);
            info!(path = %path.display(), "no output PDF specified; using default");
            path
        }
    };

    if template == output {
        bail!(
            "template PDF and output PDF must be different: {}",
            template.display()
        );
    }

    Ok(RunConfig {
        identifier,
        record_variable,
        template,
        output,
        secrets,
    })
}

/// `./output/<timestamp>_<template stem>_<identifier>.pdf`
fn default_output_path(template: &Path, identifier: &str) -> PathBuf {
    let stem = template
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("template");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("./output/{timestamp}_{stem}_{identifier}.pdf"))
}

//! Fill a PDF form template with data from a single REDCap record.

mod config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use capfill_core::normalize;
use capfill_pdf::{fill, list_fields, load_template, write_document};
use capfill_redcap::{ApiCredentials, RedcapClient};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "capfill", version, about = "REDCap → PDF auto-fill")]
struct Args {
    /// Unique id of the REDCap record to fill the template with.
    #[arg(short = 'd', long, required_unless_present = "list_fields")]
    identifier: Option<String>,

    /// REDCap variable that uniquely identifies each record.
    #[arg(short = 'v', long, default_value = "record_id")]
    record_variable: String,

    /// Path to the empty template .pdf file.
    #[arg(short = 'i', long)]
    input_pdf: String,

    /// Path of the filled .pdf file to create. Defaults to
    /// ./output/<timestamp>_<template>_<identifier>.pdf
    #[arg(short = 'o', long)]
    output_pdf: Option<String>,

    /// JSON file supplying the project's `api_key` and `url`.
    #[arg(long, default_value = "secrets.json")]
    secrets: PathBuf,

    /// Print the template's fillable field names and exit.
    #[arg(long)]
    list_fields: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if args.list_fields {
        let doc = load_template(Path::new(&args.input_pdf)).context("loading template PDF")?;
        for name in list_fields(&doc).context("walking template annotations")? {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(identifier) = args.identifier else {
        anyhow::bail!("--identifier is required unless --list-fields is given");
    };

    let run = config::build(
        identifier,
        args.record_variable,
        args.input_pdf,
        args.output_pdf,
        args.secrets,
    )?;
    info!(
        record = %run.identifier,
        variable = %run.record_variable,
        template = %run.template.display(),
        output = %run.output.display(),
        "starting fill run"
    );

    let credentials = ApiCredentials::from_file(&run.secrets).context("loading secrets file")?;
    let client = RedcapClient::new(&credentials);

    let metadata = client
        .fetch_metadata()
        .await
        .context("fetching project metadata")?;
    let record = client
        .fetch_record(&run.record_variable, &run.identifier)
        .await
        .context("fetching record")?;

    let prepared = normalize(record, &metadata).context("normalizing record")?;

    let mut doc = load_template(&run.template).context("loading template PDF")?;
    let report = fill(&mut doc, &prepared).context("filling template")?;
    info!(
        text = report.text_fields,
        checkboxes = report.checkboxes,
        radios = report.radio_buttons,
        skipped = report.skipped,
        "filled template"
    );

    write_document(&mut doc, &run.output).context("writing filled PDF")?;
    info!(path = %run.output.display(), "done");
    Ok(())
}

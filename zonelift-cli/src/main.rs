//! zonelift
//!
//! Generates Terraform locals and import blocks for existing Route53 hosted
//! zones so they can be adopted into an IaC project without manual
//! transcription. Configuration comes from a JSON file; two flags override
//! it per run.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::Colorize;

use zonelift_provider_aws::Route53Source;

use crate::config::{ExportTarget, Options};

mod config;
mod export;

#[derive(Parser)]
#[command(name = "zonelift")]
#[command(about = "Generate Terraform locals and import blocks for Route53 hosted zones", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Comma-separated hostname regexes; only matching records are exported
    #[arg(long)]
    only_hostnames: Option<String>,

    /// Export records, zones, or both (default: both)
    #[arg(long, value_enum)]
    export_target: Option<ExportTarget>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = match config::load(
        &cli.config,
        cli.only_hostnames.as_deref(),
        cli.export_target,
    ) {
        Ok(options) => options,
        Err(e) => exit_error(e),
    };
    let hostnames = match config::hostname_filters(&options) {
        Ok(filters) => filters,
        Err(e) => exit_error(e),
    };

    let source = Route53Source::new(options.profile.as_deref()).await;

    match export::run(&options, &hostnames, &source).await {
        Ok(report) if report.is_partial() => {
            eprintln!(
                "Completed with partial success: {}/{} zones exported.",
                report.exported, report.total
            );
            process::exit(2);
        }
        Ok(report) => print_summary(&options, report.exported),
        Err(e) => exit_error(e),
    }
}

fn exit_error(e: anyhow::Error) -> ! {
    eprintln!("{} {e:#}", "Error:".red().bold());
    process::exit(1);
}

fn print_summary(options: &Options, exported: usize) {
    let mut actions = Vec::new();
    let mut destinations = Vec::new();
    if options.export_target.records_enabled() {
        actions.push("records");
        let destination = if options.single_zone {
            options.single_zone_records_file.display().to_string()
        } else {
            options.output_dir.display().to_string()
        };
        destinations.push(format!("records -> {destination}"));
    }
    if options.export_target.zones_enabled() && !options.single_zone {
        actions.push("zones");
        destinations.push(format!("zones -> {}", options.zones_file.display()));
    }

    let noun = if exported == 1 { "zone" } else { "zones" };
    let actions = if actions.is_empty() {
        "data".to_string()
    } else {
        actions.join(" and ")
    };
    let destinations = if destinations.is_empty() {
        "requested outputs".to_string()
    } else {
        destinations.join("; ")
    };
    println!("Exported {actions} for {exported} {noun} ({destinations})");
}

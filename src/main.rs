use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use color_print::cprintln;
use strum::IntoEnumIterator;

use fontprof::config::FontprofConfig;
use fontprof::formats::FontFormat;
use fontprof::report::ReportWriter;
use fontprof::runner::{self, FileFailure};

#[derive(Parser)]
#[command(name = "fontprof")]
#[command(about = "Extract font performance metrics from Firefox Profiler captures")]
#[command(version)]
struct Cli {
    /// Font formats to process (default: all formats with a capture directory)
    #[arg(long = "format", value_enum, value_name = "FORMAT")]
    formats: Vec<FontFormat>,

    /// Root directory containing one capture directory per format
    #[arg(long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Directory to write per-format CSV reports into
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Identity of the web content thread (the capture rig's URL)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Enable verbose output (show per-capture lookup details)
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --verbose flag or RUST_LOG env var
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "info" }),
    )
    .init();

    match run(&cli) {
        Ok(0) => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            eprintln!("{e:#}");
            process::exit(1);
        }
    }
}

/// Runs the batch for every selected format and returns the number of
/// captures that failed.
fn run(cli: &Cli) -> anyhow::Result<usize> {
    let mut config = FontprofConfig::load().context("Failed to load configuration")?;
    if let Some(input) = &cli.input {
        config.input_root = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output_root = output.clone();
    }
    if let Some(url) = &cli.url {
        config.target_url = url.clone();
    }

    // An explicit --format must exist; the default all-formats sweep
    // tolerates partial capture sets.
    let sweep_all = cli.formats.is_empty();
    let formats: Vec<FontFormat> = if sweep_all {
        FontFormat::iter().collect()
    } else {
        cli.formats.clone()
    };

    let mut failures: Vec<FileFailure> = Vec::new();
    for format in formats {
        let input_dir = config.input_dir(format);
        if sweep_all && !input_dir.is_dir() {
            log::warn!(
                "no capture directory at {}, skipping {format}",
                input_dir.display()
            );
            continue;
        }
        let files = runner::input_files(&input_dir)
            .with_context(|| format!("Failed to list captures in {}", input_dir.display()))?;

        let report_path = config.output_file(format);
        let mut report = ReportWriter::create(&report_path)
            .with_context(|| format!("Failed to create report {}", report_path.display()))?;

        let summary = runner::process_files(
            &files,
            &config.target_url,
            &config.font_uris(format),
            &mut report,
        )
        .with_context(|| format!("Failed writing report {}", report_path.display()))?;

        cprintln!(
            "✅ <green>{format}: {} of {} capture(s) -> {}</>",
            summary.rows,
            summary.attempted,
            report_path.display()
        );
        failures.extend(summary.failures);
    }

    if !failures.is_empty() {
        cprintln!(
            "\n❌ <red>{} capture(s) could not be processed:</>",
            failures.len()
        );
        for failure in &failures {
            cprintln!("  <bold>{}</>: {}", failure.path.display(), failure.error);
        }
    }
    Ok(failures.len())
}

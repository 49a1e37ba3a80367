use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dex_builds_core::{BuildRecord, DexBundle, MergeStrategy, merge_bundles};
use dex_builds_extract::batch::{
    collect_bundle_paths, extract_directory, load_and_validate_bundle, subject_from_path,
};
use dex_builds_extract::config::ExtractConfig;
use dex_builds_extract::extract_builds_with_report;
use dex_builds_extract::output::{
    OutputFormat, format_bundle, format_page, format_report, format_report_bundle,
};
use dex_builds_extract::report::ExtractionReport;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Markdown => Self::Markdown,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliMergeStrategy {
    PreferBase,
    PreferOverlay,
    Append,
}

impl From<CliMergeStrategy> for MergeStrategy {
    fn from(strategy: CliMergeStrategy) -> Self {
        match strategy {
            CliMergeStrategy::PreferBase => Self::PreferBase,
            CliMergeStrategy::PreferOverlay => Self::PreferOverlay,
            CliMergeStrategy::Append => Self::Append,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "dex-extract")]
#[command(about = "Extract build records from saved wiki pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract every page in a directory into one bundle.
    Extract(ExtractArgs),
    /// Extract a single page file.
    ParseFile(ParseFileArgs),
    /// Extract a single page read from stdin.
    ParseStdin(ParseStdinArgs),
    /// Validate one or more bundle JSON files.
    Validate(ValidateArgs),
    /// Merge two bundle JSON files.
    Merge(MergeArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Directory containing one page file per subject.
    #[arg(long)]
    input: PathBuf,
    /// Output bundle path.
    #[arg(long)]
    output: PathBuf,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of parallel extraction jobs (overrides the config file).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format for the bundle and report.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Also write the per-page extraction report to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Path to the page file.
    #[arg(long)]
    input: PathBuf,
    /// Subject name (default: the file stem).
    #[arg(long)]
    subject: Option<String>,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output both builds and extraction report.
    #[arg(long)]
    with_report: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    /// Subject name for the page being parsed.
    #[arg(long)]
    subject: String,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output both builds and extraction report.
    #[arg(long)]
    with_report: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Bundle files and/or directories containing bundle JSON files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Base bundle JSON file.
    base: PathBuf,
    /// Overlay bundle JSON file.
    overlay: PathBuf,
    /// Output bundle path.
    #[arg(long)]
    output: PathBuf,
    /// How to resolve subjects present in both bundles.
    #[arg(long, default_value = "prefer-overlay")]
    strategy: CliMergeStrategy,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Extract(args) => run_extract(args),
        Command::ParseFile(args) => run_parse_file(args),
        Command::ParseStdin(args) => run_parse_stdin(args),
        Command::Validate(args) => run_validate(args),
        Command::Merge(args) => run_merge(args),
    };

    if let Err(err) = result {
        error!(error = %err, "command failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ExtractConfig, String> {
    match path {
        Some(path) => ExtractConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(ExtractConfig::default()),
    }
}

fn run_extract(args: ExtractArgs) -> Result<(), String> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(jobs) = args.jobs {
        if jobs == 0 {
            return Err("--jobs must be at least 1".to_string());
        }
        config.batch.jobs = Some(jobs);
    }

    let format: OutputFormat = args.format.into();
    let outcome = extract_directory(&args.input, &config).map_err(|e| e.to_string())?;

    let raw = format_bundle(&outcome.bundle, format).map_err(|e| e.to_string())?;
    write_output(&args.output, &raw)?;
    println!(
        "Extracted {} build(s) for {} subject(s) into '{}'.",
        outcome.bundle.build_count(),
        outcome.bundle.page_count(),
        args.output.display()
    );

    if let Some(ref report_path) = args.report {
        let report_bundle = outcome.report_bundle();
        let raw = format_report_bundle(&report_bundle, format).map_err(|e| e.to_string())?;
        write_output(report_path, &raw)?;
        info!(path = %report_path.display(), "Wrote extraction report");
    }

    if !outcome.failures.is_empty() {
        warn!(
            count = outcome.failures.len(),
            subjects = %outcome.failures.join(", "),
            "Pages contributed no builds"
        );
    }
    if !outcome.warnings.is_empty() {
        warn!(
            count = outcome.warnings.len(),
            "Warnings emitted during extraction; see the report for details"
        );
    }

    Ok(())
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let bytes = fs::read(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    let html = String::from_utf8_lossy(&bytes);
    let subject = match args.subject {
        Some(subject) => subject,
        None => subject_from_path(&args.input).ok_or_else(|| {
            format!(
                "Cannot derive a subject from '{}'; pass --subject",
                args.input.display()
            )
        })?,
    };
    let config = load_config(args.config.as_deref())?;
    run_parse_page(&subject, &html, &config, args.with_report, args.format.into())
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let mut html = String::new();
    std::io::stdin()
        .read_to_string(&mut html)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    let config = load_config(args.config.as_deref())?;
    run_parse_page(
        &args.subject,
        &html,
        &config,
        args.with_report,
        args.format.into(),
    )
}

fn run_parse_page(
    subject: &str,
    html: &str,
    config: &ExtractConfig,
    with_report: bool,
    format: OutputFormat,
) -> Result<(), String> {
    if subject.trim().is_empty() {
        return Err("Subject cannot be empty".to_string());
    }

    let run = extract_builds_with_report(subject, html, config).map_err(|e| e.to_string())?;

    if !with_report {
        println!("{}", format_page(&run.page, format).map_err(|e| e.to_string())?);
        return Ok(());
    }

    #[derive(serde::Serialize)]
    struct ParseOutput<'a> {
        builds: &'a [BuildRecord],
        report: &'a ExtractionReport,
    }

    let output = ParseOutput {
        builds: &run.page.builds,
        report: &run.report,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{yaml}");
        }
        OutputFormat::Markdown | OutputFormat::Table => {
            print!("{}", format_page(&run.page, format).map_err(|e| e.to_string())?);
            print!("{}", format_report(&run.report, format).map_err(|e| e.to_string())?);
        }
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let paths = collect_bundle_paths(&args.inputs).map_err(|e| e.to_string())?;

    let mut builds = 0usize;
    for path in &paths {
        let bundle = load_and_validate_bundle(path).map_err(|e| e.to_string())?;
        builds += bundle.build_count();
    }

    println!(
        "Validated {} bundle file(s) containing {builds} build(s).",
        paths.len()
    );
    Ok(())
}

fn run_merge(args: MergeArgs) -> Result<(), String> {
    let base = load_and_validate_bundle(&args.base).map_err(|e| e.to_string())?;
    let overlay = load_and_validate_bundle(&args.overlay).map_err(|e| e.to_string())?;

    let merged: DexBundle = merge_bundles(&base, &overlay, args.strategy.into());
    let raw = format_bundle(&merged, OutputFormat::Json).map_err(|e| e.to_string())?;
    write_output(&args.output, &raw)?;

    println!(
        "Merged {} subject(s) into '{}'.",
        merged.page_count(),
        args.output.display()
    );
    Ok(())
}

fn write_output(path: &Path, raw: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    fs::write(path, raw).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}

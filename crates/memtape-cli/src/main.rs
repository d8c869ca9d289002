use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use glob::glob;
use memtape_core::{
    DecodeError, DecodedRegion, TagContext, Tape, ViewOptions, build_tape_view, check_fields,
    decode, make_decode_report, make_layout_report,
};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("MEMTAPE_BUILD_COMMIT"),
    " ",
    env!("MEMTAPE_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "memtape")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode memory-layout tapes and lay them out for rendering.",
    long_about = None,
    after_help = "Examples:\n  memtape decode dump.tape --stdout\n  memtape layout dump.tape -o layout.json --zoom 16\n  memtape layout 'out/*.tape' --stdout --strict"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a tape and write its regions as JSON.
    Decode {
        /// Path (or glob matching exactly one file) of a tape
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode a tape, pad every region and write the view tree as JSON.
    Layout {
        /// Path (or glob matching exactly one file) of a tape
        input: PathBuf,

        /// Pixels per address unit
        #[arg(long, default_value_t = memtape_core::DEFAULT_ZOOM)]
        zoom: u64,

        /// Fail if any region has overlapping, unordered or out-of-span fields
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output, including warnings from the layout engine
    #[arg(long)]
    quiet: bool,
}

impl Commands {
    fn output(&self) -> &OutputArgs {
        match self {
            Commands::Decode { output, .. } | Commands::Layout { output, .. } => output,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.command.output().quiet);

    let result = match cli.command {
        Commands::Decode { input, output } => cmd_decode(&input, &output),
        Commands::Layout {
            input,
            zoom,
            strict,
            output,
        } => cmd_layout(&input, zoom, strict, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match verbose {
        _ if quiet => LevelFilter::ERROR,
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

struct LoadedTape {
    path: PathBuf,
    bytes: u64,
    regions: Vec<DecodedRegion>,
}

fn cmd_decode(input: &Path, output: &OutputArgs) -> Result<(), CliError> {
    let loaded = load_tape(input, output)?;
    let report = make_decode_report(
        &loaded.path.display().to_string(),
        loaded.bytes,
        loaded.regions,
    );
    emit(&report, output)
}

fn cmd_layout(input: &Path, zoom: u64, strict: bool, output: &OutputArgs) -> Result<(), CliError> {
    let loaded = load_tape(input, output)?;
    let tape = Tape::from_decoded(&loaded.regions);

    if strict {
        for (index, (region, decoded)) in tape.regions.iter().zip(&loaded.regions).enumerate() {
            check_fields(region.addr, region.size, &region.fields).map_err(|err| {
                CliError::new(
                    format!(
                        "region {index} ({} at {}): {err}",
                        decoded.kind,
                        memtape_core::hex(region.addr)
                    ),
                    Some("rerun without --strict to lay out fields as written".to_string()),
                )
            })?;
        }
    }

    let view = build_tape_view(&tape, &ViewOptions { zoom })
        .context("layout failed")?;
    let report = make_layout_report(&loaded.path.display().to_string(), loaded.bytes, view);
    emit(&report, output)
}

fn load_tape(input: &Path, output: &OutputArgs) -> Result<LoadedTape, CliError> {
    let path = resolve_input_path(input)?;
    validate_input_file(&path)?;
    if let Some(report) = output.report.as_ref() {
        ensure_distinct_output(&path, report)?;
    }

    let data = fs::read(&path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = data.len(), "read tape");

    let regions = decode(&data).map_err(|err| {
        CliError::new(
            format!("failed to decode {}: {err}", path.display()),
            Some(decode_hint(&err, data.len()).to_string()),
        )
    })?;
    tracing::info!(regions = regions.len(), "decoded tape");

    Ok(LoadedTape {
        path,
        bytes: data.len() as u64,
        regions,
    })
}

fn decode_hint(err: &DecodeError, len: usize) -> &'static str {
    match err {
        DecodeError::Truncated {
            at_offset,
            bytes_needed: 1,
            ..
        } if *at_offset == len => "the tape must end with an EOF tag (0xff)",
        DecodeError::Truncated { .. } => {
            "the tape ends inside a record; the writer may have run out of buffer"
        }
        DecodeError::UnexpectedTag {
            context: TagContext::TopLevel,
            ..
        } => "only START (0x01) or EOF (0xff) may appear between regions",
        DecodeError::UnexpectedTag {
            context: TagContext::RegionBody,
            ..
        } => "only FIELD (0x03) or END (0x02) may appear inside a region",
    }
}

fn emit<T: Serialize>(report: &T, output: &OutputArgs) -> Result<(), CliError> {
    let json = serialize_report(report, output.pretty, output.compact)?;

    if output.stdout {
        print!("{}", json);
        return Ok(());
    }

    let report_path = output.report.as_ref().ok_or_else(|| {
        CliError::new(
            "missing output path",
            Some("use -o/--report or --stdout".to_string()),
        )
    })?;
    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(report_path, json)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    if !output.quiet {
        eprintln!("OK: report written -> {}", report_path.display());
    }
    Ok(())
}

fn serialize_report<T: Serialize>(report: &T, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn ensure_distinct_output(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A missing output directory cannot contain the input.
    let Ok(report_dir) = fs::canonicalize(report_dir) else {
        return Ok(());
    };
    let file_name = report
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass the path of a tape written by an instrumented program".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a single tape file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single tape file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

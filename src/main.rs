use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use single_header::config::{load_config_file, resolve_config};
use single_header::{amalgamate, validate, AmalgamateConfig, ConfigOverrides, DirSource, SpliceStrategy};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "single-header", version, about = "Merge a header-only library into one header")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge the entry file and the headers it lists into one output file
    Build(BuildArgs),
    /// Check that the entry file lists every header it needs, in order
    Check(CheckArgs),
}

#[derive(Args)]
struct PathArgs {
    /// TOML config file (default: single-header.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the entry file and its headers
    #[arg(long)]
    root: Option<PathBuf>,

    /// Entry file, relative to the root
    #[arg(long)]
    entry: Option<String>,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    paths: PathArgs,

    /// Destination of the merged header (default: entry file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Marker text stripped from every inlined header
    #[arg(long)]
    guard_marker: Option<String>,

    #[arg(long, value_enum)]
    strategy: Option<SpliceStrategy>,

    /// Write the output directly instead of through a temporary file
    #[arg(long)]
    no_atomic: bool,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct CheckArgs {
    #[command(flatten)]
    paths: PathArgs,

    /// Fail on warnings as well as errors
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Command::Build(args) => run_build(args),
        Command::Check(args) => run_check(args),
    }
}

fn init_logger(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn load_config(paths: PathArgs, overrides: ConfigOverrides) -> Result<AmalgamateConfig> {
    let file = load_config_file(paths.config.as_deref())?;
    resolve_config(
        file,
        ConfigOverrides {
            root: paths.root,
            entry: paths.entry,
            ..overrides
        },
    )
}

fn run_build(args: BuildArgs) -> Result<()> {
    let start = Instant::now();

    let config = load_config(
        args.paths,
        ConfigOverrides {
            output: args.output,
            guard_marker: args.guard_marker,
            strategy: args.strategy,
            atomic_write: args.no_atomic.then_some(false),
            ..Default::default()
        },
    )?;

    let report = amalgamate(&config)
        .with_context(|| format!("Failed to merge {}", config.entry_path().display()))?;

    if let Some(path) = &args.report {
        report.write_to_file(path)?;
        log::info!("Report written to {}", path.display());
    }

    println!(
        "✓ Merged {} headers into {} ({} bytes) [{:.2}s]",
        report.directives.len(),
        report.output_path.display(),
        report.output_bytes,
        start.elapsed().as_secs_f64()
    );
    if !report.diagnostics.is_empty() {
        println!("  {} directive-like line(s) left as text", report.diagnostics.len());
    }

    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let config = load_config(args.paths, ConfigOverrides::default())?;
    let source = DirSource::new(&config.root_dir);

    let report = validate(&source, &config.entry_file)
        .with_context(|| format!("Failed to check {}", config.entry_path().display()))?;

    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic);
    }

    if report.has_errors() || (args.strict && report.has_warnings()) {
        bail!(
            "{}: {} error(s), {} warning(s)",
            report.entry_file,
            report.error_count(),
            report.warning_count()
        );
    }

    println!(
        "✓ {} lists {} headers ({} warning(s))",
        report.entry_file,
        report.listed.len(),
        report.warning_count()
    );

    Ok(())
}

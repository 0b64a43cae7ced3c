//! ocp - Overwrite Copy
//!
//! Mirror every entry of a source directory into a destination directory,
//! replacing same-named entries. Powered by overcopy.

use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use overcopy::{
    Error as MirrorError, MirrorOptions, MirrorPlan, MirrorStats, SymlinkMode,
    create_progress_bar, plan,
};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// ocp - Copy a directory's contents into another, overwriting collisions
///
/// Every entry directly inside SOURCE is copied into DEST. Any entry in DEST
/// with the same name is removed first, whatever its type. Entries that exist
/// only in DEST are left untouched. DEST is created if missing.
///
/// Usage:
///   ocp SOURCE DEST
#[derive(Parser, Debug)]
#[command(name = "ocp", version, about, long_about = None)]
struct Args {
    /// Source directory
    source: PathBuf,

    /// Destination directory (created if missing)
    dest: PathBuf,

    /// Recreate symlinks as links instead of copying their targets
    #[arg(short = 'P', long)]
    preserve_symlinks: bool,

    /// Do not preserve file timestamps
    #[arg(long)]
    no_times: bool,

    /// Do not preserve permissions
    #[arg(long)]
    no_perms: bool,

    /// Maximum directory depth below each entry (default: unlimited)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Print what would be replaced without changing anything
    #[arg(short = 'n', long = "plan", alias = "dry-run")]
    plan: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputMode,

    /// Disable progress bar and confirmation message
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
        }
    }
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Mirror(#[from] MirrorError),

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            Self::Mirror(source) => source.kind().as_str(),
            Self::JsonSerialize { .. } => "internal",
        }
    }
}

#[derive(Debug, Clone)]
struct EffectiveConfig {
    preserve_timestamps: bool,
    preserve_permissions: bool,
    symlinks: SymlinkMode,
    max_depth: Option<usize>,
    output_mode: OutputMode,
}

impl EffectiveConfig {
    fn to_json_value(&self) -> Value {
        json!({
            "preserve_timestamps": self.preserve_timestamps,
            "preserve_permissions": self.preserve_permissions,
            "symlink_mode": self.symlinks.as_str(),
            "max_depth": self.max_depth,
            "output_mode": self.output_mode.as_str(),
        })
    }

    fn print_human_stderr(&self) {
        eprintln!("Effective configuration:");
        eprintln!("  preserve_timestamps: {}", self.preserve_timestamps);
        eprintln!("  preserve_permissions: {}", self.preserve_permissions);
        eprintln!("  symlink_mode: {}", self.symlinks.as_str());
        match self.max_depth {
            Some(depth) => eprintln!("  max_depth: {depth}"),
            None => eprintln!("  max_depth: unlimited"),
        }
        eprintln!("  output_mode: {}", self.output_mode.as_str());
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(error) = run(&args) {
        if args.output == OutputMode::Json {
            // Best effort: the process exits with an error either way
            let _ = print_json_value(&json!({
                "schema_version": "1.0",
                "mode": if args.plan { "plan" } else { "execute" },
                "source": display_path(&args.source),
                "destination": display_path(&args.dest),
                "outcome": "failed",
                "error_kind": error.code(),
                "error_message": error.to_string(),
            }));
        }
        eprintln!("error[{}]: {}", error.code(), error);
        std::process::exit(1);
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the flag-derived level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: &Args) -> CliResult<()> {
    let (options, effective_config) = build_options_and_effective_config(args);

    let plan = plan(&args.source, &args.dest, &options)?;
    tracing::debug!(
        entries = plan.len(),
        destination_exists = plan.destination_exists(),
        "planned mirror"
    );

    if effective_config.output_mode == OutputMode::Human && args.verbose {
        effective_config.print_human_stderr();
    }

    if args.plan {
        return emit_plan_output(&effective_config, &plan);
    }

    let pb = if effective_config.output_mode == OutputMode::Human && !args.quiet && !args.verbose
    {
        Some(create_progress_bar(plan.len() as u64))
    } else {
        None
    };

    let result = execute_plan(&plan, &options, pb.as_ref());

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let stats = result?;

    match effective_config.output_mode {
        OutputMode::Human => {
            if !args.quiet {
                print_stats(&plan, &stats, args.verbose);
            }
            Ok(())
        }
        OutputMode::Json => {
            let stats_value = serde_json::to_value(&stats)
                .map_err(|source| CliError::JsonSerialize { source })?;
            print_json_value(&json!({
                "schema_version": "1.0",
                "mode": "execute",
                "source": display_path(plan.source()),
                "destination": display_path(plan.destination()),
                "outcome": "mirrored",
                "effective_config": effective_config.to_json_value(),
                "stats": stats_value,
            }))
        }
    }
}

fn build_options_and_effective_config(args: &Args) -> (MirrorOptions, EffectiveConfig) {
    let mut options = MirrorOptions::default();

    if args.preserve_symlinks {
        options = options.with_symlinks(SymlinkMode::Preserve);
    }
    if args.no_times {
        options = options.without_timestamps();
    }
    if args.no_perms {
        options = options.without_permissions();
    }
    if let Some(depth) = args.max_depth {
        options = options.with_max_depth(depth);
    }

    let effective_config = EffectiveConfig {
        preserve_timestamps: options.preserve_timestamps,
        preserve_permissions: options.preserve_permissions,
        symlinks: options.symlinks,
        max_depth: options.max_depth,
        output_mode: args.output,
    };

    (options, effective_config)
}

/// Mirror each planned entry, advancing the progress bar per entry.
fn execute_plan(
    plan: &MirrorPlan,
    options: &MirrorOptions,
    pb: Option<&ProgressBar>,
) -> CliResult<MirrorStats> {
    let stats = plan.execute_with(options, |entry| {
        if let Some(pb) = pb {
            pb.set_message(entry.name.to_string_lossy().into_owned());
            pb.inc(1);
        }
    })?;
    Ok(stats)
}

fn emit_plan_output(effective_config: &EffectiveConfig, plan: &MirrorPlan) -> CliResult<()> {
    match effective_config.output_mode {
        OutputMode::Human => {
            if !plan.destination_exists() {
                println!("create {}", plan.destination().display());
            }
            println!("Plan ({} entries):", plan.len());
            for entry in plan.entries() {
                println!(
                    "  {} {} {} -> {}",
                    entry.action.as_str(),
                    entry.kind.as_str(),
                    entry.source.display(),
                    entry.destination.display()
                );
            }
            Ok(())
        }
        OutputMode::Json => {
            let items = plan
                .entries()
                .iter()
                .map(|entry| {
                    json!({
                        "name": entry.name.to_string_lossy(),
                        "source": display_path(&entry.source),
                        "destination": display_path(&entry.destination),
                        "kind": entry.kind.as_str(),
                        "action": entry.action.as_str(),
                    })
                })
                .collect::<Vec<Value>>();
            print_json_value(&json!({
                "schema_version": "1.0",
                "mode": "plan",
                "source": display_path(plan.source()),
                "destination": display_path(plan.destination()),
                "destination_exists": plan.destination_exists(),
                "effective_config": effective_config.to_json_value(),
                "items": items,
            }))
        }
    }
}

fn print_stats(plan: &MirrorPlan, stats: &MirrorStats, verbose: bool) {
    println!(
        "Copied '{}' into '{}' (overwriting existing entries).",
        plan.source().display(),
        plan.destination().display()
    );

    if verbose {
        println!("Mirror completed in {:?}", stats.duration);
        println!("  Entries:        {}", stats.entries_mirrored);
        println!("  Replaced:       {}", stats.entries_replaced);
        println!("  Files copied:   {}", stats.files_copied);
        println!("  Symlinks:       {}", stats.symlinks_copied);
        println!("  Directories:    {}", stats.dirs_created);
        println!("  Total size:     {}", format_bytes(stats.bytes_copied));
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

//! ord-diff: structural diff and matching of nested reaction records
//!
//! Compares single records, unordered collections of records, and partitions
//! of records into groups.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use ord_diff::{
    cli,
    config::{AppConfig, ConfigOverrides, DiffConfig, DiffPaths, InputShape, Validatable},
    matching::OversizeStrategy,
    pipeline::exit_codes,
    reports::ReportFormat,
    OrdDiffError,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ord-diff")]
#[command(version)]
#[command(about = "Structural diff and matching of nested reaction records", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No changes detected (or no --fail-on-change)
    1  Changes detected with --fail-on-change
    3  Error occurred

EXAMPLES:
    # Compare two compounds
    ord-diff diff old.json new.json

    # Compare two lists of compounds, emitting JSON
    ord-diff diff-list reference.json extracted.json -o json > diff.json

    # Check that grouped inputs kept their grouping
    ord-diff diff-groups reference.json extracted.json --fail-on-change")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by the diff subcommands
#[derive(Parser)]
struct DiffArgs {
    /// Path to the reference document
    old: PathBuf,

    /// Path to the compared document
    new: PathBuf,

    /// Output format (defaults to the config file value, then summary)
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// List unchanged leaves in table and JSON output
    #[arg(long)]
    include_unchanged: bool,

    /// Exit with code 1 if any changes detected
    #[arg(long)]
    fail_on_change: bool,

    /// Cost added when two record names differ
    #[arg(long)]
    name_weight: Option<f64>,

    /// Largest collection matched exactly
    #[arg(long)]
    max_exact_size: Option<usize>,

    /// What to do with collections above --max-exact-size
    #[arg(long, value_enum)]
    oversize: Option<OversizeStrategy>,

    /// Compare lists position by position instead of ignoring order
    #[arg(long)]
    positional: bool,
}

impl DiffArgs {
    /// Settings given on the command line, to apply over the file
    fn overrides(&self, quiet: bool) -> ConfigOverrides {
        ConfigOverrides {
            name_weight: self.name_weight,
            max_exact_size: self.max_exact_size,
            oversize: self.oversize,
            positional: self.positional,
            format: self.output,
            output_file: self.output_file.clone(),
            include_unchanged: self.include_unchanged,
            fail_on_change: self.fail_on_change,
            quiet,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two records
    Diff(DiffArgs),

    /// Compare two JSON arrays of records
    DiffList(DiffArgs),

    /// Compare two JSON arrays of arrays of records
    DiffGroups(DiffArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .ord-diff.yaml in the current directory
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging; reports go to stdout, logs to stderr
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(cli) {
        Ok(exit_codes::SUCCESS) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Diff(args) => {
            run_diff(cli.config.as_deref(), cli.quiet, args, InputShape::Record)
        }
        Commands::DiffList(args) => run_diff(
            cli.config.as_deref(),
            cli.quiet,
            args,
            InputShape::Collection,
        ),
        Commands::DiffGroups(args) => {
            run_diff(cli.config.as_deref(), cli.quiet, args, InputShape::Groups)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "ord-diff", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = ord_diff::config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let (config, loaded_from) =
                        ord_diff::config::load_or_default(cli.config.as_deref());
                    if let Some(path) = &loaded_from {
                        eprintln!("# Loaded from: {}", path.display());
                    } else {
                        eprintln!("# No config file found; showing defaults");
                    }
                    let yaml =
                        serde_yaml::to_string(&config).context("failed to serialize config")?;
                    print!("{yaml}");
                }
                ConfigAction::Path => {
                    let search_paths: [Option<String>; 4] = [
                        std::env::current_dir()
                            .ok()
                            .map(|p| p.display().to_string()),
                        ord_diff::config::file::find_git_root()
                            .map(|p| format!("{} (git root)", p.display())),
                        dirs::config_dir().map(|p| p.join("ord-diff").display().to_string()),
                        dirs::home_dir().map(|p| p.display().to_string()),
                    ];
                    eprintln!("Config file search paths (in order):");
                    for path in search_paths.into_iter().flatten() {
                        eprintln!("  {path}");
                    }
                    eprintln!();
                    eprintln!("Recognized file names:");
                    for name in ord_diff::config::CONFIG_FILE_NAMES {
                        eprintln!("  {name}");
                    }
                    eprintln!();
                    match ord_diff::config::discover_config_file(cli.config.as_deref()) {
                        Some(path) => eprintln!("Active config file: {}", path.display()),
                        None => eprintln!("No config file found."),
                    }
                }
                ConfigAction::Init => {
                    let target = std::env::current_dir()
                        .context("cannot determine current directory")?
                        .join(".ord-diff.yaml");
                    if target.exists() {
                        anyhow::bail!(
                            "{} already exists. Remove it first to re-initialize.",
                            target.display()
                        );
                    }
                    let content = ord_diff::config::generate_example_config();
                    std::fs::write(&target, content)
                        .with_context(|| format!("failed to write {}", target.display()))?;
                    eprintln!("Created {}", target.display());
                }
            }
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_diff(
    config_path: Option<&Path>,
    quiet: bool,
    args: DiffArgs,
    shape: InputShape,
) -> Result<i32> {
    let overrides = args.overrides(quiet);
    let (app, loaded_from) =
        AppConfig::from_file_with_overrides(config_path, &overrides);
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let errors = app.validate();
    if !errors.is_empty() {
        let listed: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(OrdDiffError::config(format!("\n  {}", listed.join("\n  "))).into());
    }

    let config = DiffConfig::new(
        DiffPaths {
            old: args.old,
            new: args.new,
        },
        shape,
        app,
    );
    cli::run_diff(config)
}

// logirecon CLI - shipment cost vs. sales reconciliation report

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_INPUT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "logirecon")]
#[command(about = "Reconcile carrier shipment costs against sales and build an xlsx report")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a shipments export against a sales export and write the report
    #[command(after_help = "\
Examples:
  logirecon run venipak.xlsx rivile.xlsx
  logirecon run venipak.xlsx rivile.xlsx -o 2024-05.xlsx
  logirecon run venipak.csv rivile.csv --config imone.toml
  logirecon run venipak.xlsx rivile.xlsx --json > summary.json
  logirecon run venipak.xlsx rivile.xlsx --summary-json summary.json -q")]
    Run {
        /// Logistics export (xlsx, xls, ods or csv); first sheet is read
        shipments: PathBuf,

        /// Accounting sales export (xlsx, xls, ods or csv); first sheet is read
        sales: PathBuf,

        /// Output workbook path
        #[arg(long, short = 'o', default_value = "Result.xlsx")]
        output: PathBuf,

        /// Config TOML (column names, markup, sheet names, labels)
        #[arg(long, short = 'c', env = "LOGIRECON_CONFIG")]
        config: Option<PathBuf>,

        /// Print the run summary as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the run summary as JSON to a file
        #[arg(long, value_name = "PATH")]
        summary_json: Option<PathBuf>,

        /// Suppress the human summary on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Check a config file without running
    #[command(after_help = "\
Examples:
  logirecon validate imone.toml")]
    Validate {
        /// Path to the config TOML
        config: PathBuf,
    },

    /// Print the built-in config as TOML (a starting point for customizing)
    #[command(after_help = "\
Examples:
  logirecon default-config > imone.toml")]
    DefaultConfig,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  logirecon-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Also installs the log -> tracing bridge for the library crates
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { shipments, sales, output, config, json, summary_json, quiet } => {
            recon::cmd_run(recon::RunArgs {
                shipments,
                sales,
                output,
                config,
                json,
                summary_json,
                quiet,
            })
        }
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::DefaultConfig => recon::cmd_default_config(),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

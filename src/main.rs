//! Binary entry point for isaconv.
//!
//! This binary provides the CLI interface for converting between ISA-Tab
//! bundles and ISA JSON documents.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::{Parser, Subcommand};
use commands::ReportFormat;
use isaconv::config::IsaConfig;
use isaconv::observability::{self, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// isaconv - Convert ISA metadata between ISA-Tab and ISA JSON.
#[derive(Parser)]
#[command(name = "isaconv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Convert an ISA-Tab bundle directory to ISA JSON.
    Isatab2json {
        /// Bundle directory.
        bundle: PathBuf,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the validation gate.
        #[arg(long)]
        no_validate: bool,

        /// Read with the fast parser.
        #[arg(long)]
        new_parser: bool,

        /// Write compact JSON.
        #[arg(long)]
        compact: bool,
    },

    /// Convert an ISA JSON document to an ISA-Tab bundle.
    Json2isatab {
        /// Input document, or `-` for stdin.
        input: PathBuf,

        /// Existing destination directory.
        dest: PathBuf,

        /// Skip the validation gate.
        #[arg(long)]
        no_validate: bool,
    },

    /// Validate a bundle directory or an ISA JSON document.
    Validate {
        /// Bundle directory or JSON file.
        path: PathBuf,

        /// Report format: text or json.
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match IsaConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let logging = LoggingConfig::from_settings(&config.logging, cli.verbose)
        .and_then(observability::init);
    if let Err(e) = logging {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
///
/// `validate` prints its own report, so an invalid input yields a failure
/// code instead of an error.
fn run_command(cli: Cli, config: &IsaConfig) -> isaconv::Result<ExitCode> {
    match cli.command {
        Commands::Isatab2json {
            bundle,
            output,
            no_validate,
            new_parser,
            compact,
        } => {
            let options = config
                .conversion
                .with_validation(config.conversion.validate_first && !no_validate)
                .with_new_parser(config.conversion.use_new_parser || new_parser);
            let pretty = config.pretty_json && !compact;
            commands::cmd_isatab2json(&bundle, output.as_deref(), &options, pretty)?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Json2isatab {
            input,
            dest,
            no_validate,
        } => {
            let options = config
                .conversion
                .with_validation(config.conversion.validate_first && !no_validate);
            commands::cmd_json2isatab(&input, &dest, &options)?;
            Ok(ExitCode::SUCCESS)
        },
        Commands::Validate { path, format } => {
            let valid = commands::cmd_validate(&path, format)?;
            Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        },
    }
}

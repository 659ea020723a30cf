// RollScope CLI - headless electoral-roll household analysis

mod analyze;
mod exit_codes;
mod tree;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG, EXIT_RUNTIME, EXIT_SUCCESS};
use rollscope_engine::EngineConfig;

#[derive(Parser)]
#[command(name = "rollscope")]
#[command(about = "Household structure and anomaly analysis for electoral rolls")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a roll file: group households, link relations, flag anomalies
    #[command(after_help = "\
Examples:
  rollscope analyze ward12.csv
  rollscope analyze ward12.csv --json
  rollscope analyze ward12.xlsx --config audit.toml --output result.json
  rollscope analyze ward12.csv --flagged-only --json")]
    Analyze {
        /// Roll file (.csv, .tsv, .xlsx, .xls, .ods)
        input: PathBuf,

        /// Engine config TOML (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Batch label for records without a part number (defaults to the file stem)
        #[arg(long)]
        batch: Option<String>,

        /// Output JSON to stdout instead of only the human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Restrict JSON output to flagged households
        #[arg(long)]
        flagged_only: bool,
    },

    /// Render one household's family tree
    #[command(after_help = "\
Examples:
  rollscope tree ward12.csv --house 12/5
  rollscope tree ward12.csv --house PART-09/12/5 --json")]
    Tree {
        /// Roll file (.csv, .tsv, .xlsx, .xls, .ods)
        input: PathBuf,

        /// Household key: `batch/house` or a bare house number when unambiguous
        #[arg(long)]
        house: String,

        /// Engine config TOML (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Batch label for records without a part number (defaults to the file stem)
        #[arg(long)]
        batch: Option<String>,

        /// Output the layout as JSON instead of indented text
        #[arg(long)]
        json: bool,
    },

    /// Validate an engine config without running anything
    #[command(after_help = "\
Examples:
  rollscope validate audit.toml")]
    Validate {
        /// Engine config TOML file
        config: PathBuf,
    },
}

pub struct CliError {
    pub code: u8,
    pub message: String,
}

pub fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError {
        code,
        message: message.into(),
    }
}

/// Load the engine config: explicit file, or defaults.
fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, CliError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;
            EngineConfig::from_toml(&text).map_err(|e| cli_err(EXIT_CONFIG, e.to_string()))
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Batch label: explicit flag, or the input file stem.
fn batch_label(batch: Option<String>, input: &std::path::Path) -> String {
    batch.unwrap_or_else(|| {
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("roll")
            .to_string()
    })
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;
    let config =
        EngineConfig::from_toml(&text).map_err(|e| cli_err(EXIT_CONFIG, e.to_string()))?;
    println!("config '{}' OK", config.name);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            config,
            batch,
            json,
            output,
            flagged_only,
        } => analyze::cmd_analyze(input, config, batch, json, output, flagged_only),
        Commands::Tree {
            input,
            house,
            config,
            batch,
            json,
        } => tree::cmd_tree(input, house, config, batch, json),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            ExitCode::from(e.code)
        }
    }
}

// fuzzyrecon CLI - pair records from two CSV files by fuzzy name similarity

mod exit_codes;
mod recon;
mod report;
mod util;

use std::process::ExitCode;

use clap::{ArgAction, Parser};

use fuzzyrecon_recon::ReconError;

use exit_codes::{recon_exit_code, EXIT_SUCCESS, EXIT_USAGE};
use recon::{cmd_recon, Commands};

#[derive(Parser)]
#[command(name = "fuzzyrecon")]
#[command(about = "Match records across two CSV files by fuzzy company-name similarity")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version land here too, on stdout
            return ExitCode::from(if err.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS });
        }
    };
    init_logging(cli.verbose);

    match cmd_recon(cli.command) {
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

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::InvalidCutoff(_) => Some("cutoff is a percentage between 0 and 100"),
            ReconError::MissingColumn { .. } => {
                Some("set name_column / passthrough in the config, or --name-column on the command line")
            }
            ReconError::MalformedRecord { .. } => Some("every record needs a value in its name column"),
            _ => None,
        };
        let cli = CliError::new(recon_exit_code(&err), err.to_string());
        match hint {
            Some(hint) => cli.with_hint(hint),
            None => cli,
        }
    }
}

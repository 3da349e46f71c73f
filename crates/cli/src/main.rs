// landshare CLI - Kila/Kanal/Marla share computation from a TOML request

mod convert;
mod exit_codes;
mod shares;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flexi_logger::{Logger, LoggerHandle};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "landshare")]
#[command(about = "Khewat share allocation and Kila/Kanal/Marla/Sarshai conversion")]
#[command(version)]
struct Cli {
    /// Log engine stages to stderr (same as LANDSHARE_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Allocate owner shares from a request file and check consistency
    #[command(after_help = "\
Examples:
  landshare run village.share.toml
  landshare run village.share.toml --json
  landshare run village.share.toml --output shares.json
  LANDSHARE_LOG=debug landshare run village.share.toml")]
    Run {
        /// Path to the .share.toml request file
        request: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a request file without running
    #[command(after_help = "\
Examples:
  landshare validate village.share.toml")]
    Validate {
        /// Path to the .share.toml request file
        request: PathBuf,
    },

    /// Convert a Kanal/Marla area to Kila, Kanal, Marla and Sarshai
    #[command(after_help = "\
Examples:
  landshare convert --kanals 1 --marlas 10
  landshare convert --marlas 80/3
  landshare convert --kanals 2.5 --json")]
    Convert {
        /// Kanals (decimal or a/b fraction)
        #[arg(long, allow_hyphen_values = true)]
        kanals: Option<String>,

        /// Marlas (decimal or a/b fraction)
        #[arg(long, allow_hyphen_values = true)]
        marlas: Option<String>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

/// Log spec: `-v` wins, then LANDSHARE_LOG, then RUST_LOG, else warnings only.
fn log_spec(verbose: bool) -> String {
    if verbose {
        return "debug".into();
    }
    std::env::var("LANDSHARE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".into())
}

fn init_logging(verbose: bool) -> Option<LoggerHandle> {
    let spec = log_spec(verbose);
    let started = Logger::try_with_str(&spec)
        .and_then(|logger| logger.log_to_stderr().format(flexi_logger::default_format).start());
    match started {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: logging disabled, invalid log spec `{spec}`: {e}");
            None
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { request, json, output } => shares::cmd_run(request, json, output),
        Commands::Validate { request } => shares::cmd_validate(request),
        Commands::Convert { kanals, marlas, json } => convert::cmd_convert(kanals, marlas, json),
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

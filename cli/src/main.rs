use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod encode;
mod error;
mod inspect;
mod logging;
mod output;
mod store;
mod utils;

use error::Result;

/// Exit status for every failure, usage errors included.
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "rsapub")]
#[command(about = "Build PEM RSA public keys from base64 modulus and exponent", long_about = None)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug details of the encoding steps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a modulus and public exponent as a PUBLIC KEY PEM file
    Encode {
        #[command(flatten)]
        config: encode::Config,
    },
    /// Show the modulus and exponent of a PEM public key
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Encode { config } => encode::execute(config),
        Commands::Inspect { config } => inspect::execute(config),
    }
}

/// Prints a clap usage or help message and picks the exit status.
fn parse_error_status(e: &clap::Error) -> u8 {
    if let Err(io) = e.print() {
        eprintln!("error: {io}");
        return EXIT_FAILURE;
    }
    if e.use_stderr() { EXIT_FAILURE } else { 0 }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return ExitCode::from(parse_error_status(&e)),
    };

    logging::init(logging::Verbosity::from_flags(cli.quiet, cli.verbose));

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

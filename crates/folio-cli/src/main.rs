//! # folio CLI entry point
//!
//! Parses command-line arguments, installs tracing and dispatches to the
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use folio_access::NOTICE_TARGET;

use folio_cli::read::{run_read, ReadArgs};
use folio_cli::request::{run_request, RequestArgs};
use folio_cli::session::ConnectionArgs;
use folio_cli::show::{run_show, ShowArgs};
use folio_cli::status::{run_status, StatusArgs};

/// Folio reader CLI
///
/// Inspect document packs, check and request access, and read the
/// documents you are allowed to see.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a pack and the lock state of its documents.
    Show(ShowArgs),

    /// Show your access to a pack.
    Status(StatusArgs),

    /// Request access to a pack.
    Request(RequestArgs),

    /// Open the reader on a pack.
    Read(ReadArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::new(format!("{level},{NOTICE_TARGET}=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.connection.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(auth = ?cli.connection.auth(), "folio CLI starting");

    let result = match &cli.command {
        Commands::Show(args) => run_show(args, &cli.connection).await,
        Commands::Status(args) => run_status(args, &cli.connection).await,
        Commands::Request(args) => run_request(args, &cli.connection).await,
        Commands::Read(args) => run_read(args, &cli.connection).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

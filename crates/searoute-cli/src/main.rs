use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use searoute_cli::commands::prepare::{handle_prepare_command, PrepareArgs};
use searoute_cli::commands::route::{handle_route_command, RouteArgs};
use searoute_cli::logging::{init_logging, LogFormat};
use searoute_lib::GraphLoadOptions;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sea route composition over a maritime network")]
struct Cli {
    /// Override the dataset file or directory path.
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Neither read nor write the prepared graph cache.
    #[arg(long, global = true)]
    no_cache: bool,

    /// Log output format (defaults to SEAROUTE_LOG_FORMAT, then text).
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a sea route through two or more waypoints.
    Route(RouteArgs),
    /// Decompose the dataset and write the prepared graph cache.
    Prepare(PrepareArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogFormat::resolve(cli.log_format));

    let dataset = cli.dataset.as_deref();
    match &cli.command {
        Command::Route(args) => {
            let options = GraphLoadOptions {
                use_cache: !cli.no_cache,
            };
            handle_route_command(dataset, options, args)
        }
        Command::Prepare(args) => handle_prepare_command(dataset, args),
    }
}

//! Folio CLI - note vault server.
//!
//! Provides commands for:
//! - `serve`: Start the HTTP API server
//! - `structure`: Print the category/group/tree structure as JSON
//! - `stats`: Print vault statistics as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ServeArgs, StatsArgs, StructureArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Folio - serve a markdown note vault as a JSON API.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server.
    Serve(ServeArgs),
    /// Print the note structure as JSON.
    Structure(StructureArgs),
    /// Print vault statistics as JSON.
    Stats(StatsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(args.execute(VERSION)),
            Err(e) => Err(e.into()),
        },
        Commands::Structure(args) => args.execute(VERSION),
        Commands::Stats(args) => args.execute(VERSION),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from(["folio", "serve", "-p", "9000", "--no-cache", "-v"]).unwrap();

        assert!(matches!(cli.command, Commands::Serve(ref args) if args.verbose));
    }

    #[test]
    fn test_cache_flags_conflict() {
        let result = Cli::try_parse_from(["folio", "serve", "--cache", "true", "--no-cache"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_structure_with_source_dir() {
        let cli = Cli::try_parse_from(["folio", "structure", "-s", "notes"]).unwrap();

        assert!(matches!(cli.command, Commands::Structure(_)));
    }
}

//! Binary entry point for raindrop-mcp.
//!
//! Runs the MCP server and offers a few inspection commands that print the
//! same JSON the tools return.

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

use clap::{Parser, Subcommand};
use raindrop_mcp::config::{CollectionFetch, ENV_CONFIG_PATH, RaindropConfig};
use raindrop_mcp::mcp::{McpServer, ToolRegistry};
use raindrop_mcp::observability::{self, InitOptions};
use raindrop_mcp::{CollectionService, RaindropClient};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// Raindrop.io MCP server.
#[derive(Parser)]
#[command(name = "raindrop-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio.
    Serve,

    /// Print collections grouped by sidebar group.
    Collections {
        /// Only top-level collections.
        #[arg(long, conflicts_with = "flat")]
        roots: bool,

        /// Merged flat list without grouping or nesting.
        #[arg(long)]
        flat: bool,

        /// Fetch strategy: roots-and-children or all.
        #[arg(long)]
        fetch: Option<String>,
    },

    /// Print the user's groups.
    Groups,

    /// Print the authenticated user.
    User,

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: RaindropConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => cmd_serve(&config),
        Commands::Collections { roots, flat, fetch } => cmd_collections(config, roots, flat, fetch),
        Commands::Groups => print_json(&RaindropClient::new(&config)?.user()?.groups),
        Commands::User => print_json(&RaindropClient::new(&config)?.user()?),
        Commands::Config { show } => cmd_config(&config, show),
    }
}

/// Loads configuration and applies environment overrides.
///
/// Runs before logging is initialised, so every problem is returned rather
/// than logged.
fn load_config(path: Option<&str>) -> Result<RaindropConfig, Box<dyn std::error::Error>> {
    let env_path = std::env::var(ENV_CONFIG_PATH)
        .ok()
        .filter(|p| !p.trim().is_empty());

    let config = match path.map(str::to_string).or(env_path) {
        Some(config_path) => RaindropConfig::load_from_file(Path::new(&config_path))?,
        None => RaindropConfig::load_default()?,
    };
    Ok(config.with_env_overrides()?)
}

/// Serve command.
fn cmd_serve(config: &RaindropConfig) -> Result<(), Box<dyn std::error::Error>> {
    let server = McpServer::new(ToolRegistry::from_config(config)?);
    server.start()?;
    Ok(())
}

/// Collections command.
fn cmd_collections(
    config: RaindropConfig,
    roots: bool,
    flat: bool,
    fetch: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let strategy = match fetch {
        Some(name) => CollectionFetch::parse(&name)
            .ok_or_else(|| format!("unknown fetch strategy: {name}"))?,
        None => config.collection_fetch,
    };
    let service = CollectionService::new(RaindropClient::new(&config)?, strategy);

    if flat {
        print_json(&service.flat_collections()?)
    } else if roots {
        print_json(&service.root_collections()?)
    } else {
        print_json(&service.collection_tree()?)
    }
}

/// Config command.
fn cmd_config(config: &RaindropConfig, show: bool) -> Result<(), Box<dyn std::error::Error>> {
    if show {
        print!("{}", config.to_redacted_toml());
    } else {
        println!("Use --show to display configuration");
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

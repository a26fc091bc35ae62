//! HARBOR CLI
//!
//! Inspect a tool document, dry-run argument validation, and report which
//! implemented tools the capability gate exposes.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod commands;
mod config;
mod source;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use config::HarborConfig;
use harbor_tool::MINIMUM_TOOLS_VERSION;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "harbor", version)]
#[command(about = "HARBOR - schema-driven tool registry and argument gate", long_about = None)]
struct Cli {
    /// Tool document path, created from the built-in default if missing
    #[arg(long, global = true, default_value = "tools.yaml")]
    tools: PathBuf,

    /// Oldest accepted tool document version
    #[arg(long, global = true, default_value = MINIMUM_TOOLS_VERSION)]
    min_version: String,

    /// Expose only tools annotated read-only
    #[arg(long, global = true)]
    read_only: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in tool document
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List exposed tools
    List,
    /// Print a tool's input schema
    Schema {
        /// Tool name
        tool: String,
    },
    /// Validate call arguments without running the tool
    Check {
        /// Tool name
        tool: String,
        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Report implemented tools against the document
    Gate,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("harbor=debug,harbor_tool=debug,harbor_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("harbor=info,harbor_tool=info,harbor_core=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = HarborConfig::new(cli.tools, &cli.min_version, cli.read_only)?;

    if let Commands::Init { force } = cli.command {
        println!("{}", commands::init(&config, force)?);
        return Ok(());
    }

    let registry = commands::load_registry(&config)?;
    tracing::info!(
        tools = registry.len(),
        read_only = config.read_only,
        path = %config.tools_path.display(),
        "tool registry ready"
    );

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::List => {
            println!("{}", commands::list(&config, &registry));
            Ok(())
        }
        Commands::Schema { tool } => {
            println!("{}", commands::schema(&config, &registry, &tool)?);
            Ok(())
        }
        Commands::Check { tool, args } => {
            let outcome = commands::check(&config, &registry, &tool, &args);
            println!("{}", serde_json::to_string_pretty(&outcome.body)?);
            if !outcome.passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Gate => {
            println!("{}", commands::gate(&config, &registry)?);
            Ok(())
        }
    }
}

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dcflow")]
#[command(about = "Declarative VPC datacenters, provisioned and torn down idempotently", long_about = None)]
struct Cli {
    /// Log provider calls and waits (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// The two configuration files every datacenter command takes
#[derive(clap::Args)]
struct ConfigPaths {
    /// Datacenter configuration (JSON)
    datacenter: PathBuf,
    /// Hosted zone configuration (JSON)
    hosted_zone: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Create every declared resource that does not exist yet
    Provision {
        #[command(flatten)]
        paths: ConfigPaths,
    },
    /// Delete every declared resource that still exists
    Decommission {
        #[command(flatten)]
        paths: ConfigPaths,
    },
    /// Capture the target image of every live instance
    CaptureImages {
        #[command(flatten)]
        paths: ConfigPaths,
    },
    /// Check both configuration files without contacting the provider
    Validate {
        #[command(flatten)]
        paths: ConfigPaths,
    },
    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Version) {
        println!("dcflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Provision { paths } => {
            commands::provision::handle(&paths.datacenter, &paths.hosted_zone).await
        }
        Commands::Decommission { paths } => {
            commands::decommission::handle(&paths.datacenter, &paths.hosted_zone).await
        }
        Commands::CaptureImages { paths } => {
            commands::capture::handle(&paths.datacenter, &paths.hosted_zone).await
        }
        Commands::Validate { paths } => {
            commands::validate::handle(&paths.datacenter, &paths.hosted_zone)
        }
        Commands::Version => Ok(()),
    }
}

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// courtside - registrations for social sporting events
#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "Capacity-limited social event registrations", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the background scheduler
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Finalize attendance of every social past its check-in window
    Finalize,
    /// Send pending reminders and check-in codes
    Remind,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = courtside::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    courtside::observability::init_observability(
        "courtside",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
        config.observability.json,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::serve(config, host, port).await,
        Commands::Migrate => cli::migrate(config).await,
        Commands::Reset => cli::reset(config).await,
        Commands::Finalize => cli::finalize(config).await,
        Commands::Remind => cli::remind(config).await,
    }
}

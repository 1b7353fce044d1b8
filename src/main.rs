use anyhow::Result;
use clap::{Parser, Subcommand};
use stockalloc::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the HTTP API (default)
    Serve,
    /// Print the allocation table for an investment
    Allocate {
        /// Total amount to invest
        #[arg(short, long)]
        investment: Option<String>,
    },
}

impl From<Commands> for stockalloc::AppCommand {
    fn from(cmd: Commands) -> stockalloc::AppCommand {
        match cmd {
            Commands::Serve => stockalloc::AppCommand::Serve,
            Commands::Allocate { investment } => stockalloc::AppCommand::Allocate { investment },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Setup => stockalloc::cli::setup::setup(),
        cmd => stockalloc::run_command(cmd.into(), cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

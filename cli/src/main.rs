mod commands;
mod settings;

use clap::{Parser, Subcommand};
use gocd_utils::setup_logging;
use log::{error, LevelFilter};

#[derive(Parser)]
#[command(
    name = "gocd-trigger",
    version = env!("APP_VERSION"),
    about = "Schedule a GoCD pipeline run as a build step"
)]
struct Cli {
    /// Log debug output to stderr (overrides LOG_LEVEL)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule the configured pipeline once and print the build log
    Run(commands::RunArgs),
    /// Print step metadata, settings fields and known build variables as JSON
    Describe,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_logging(cli.verbose.then_some(LevelFilter::Debug)) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match cli.command {
        Commands::Run(args) => commands::handle_run(args).await,
        Commands::Describe => commands::handle_describe(),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

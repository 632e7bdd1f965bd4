//! VitalPath - health coaching study client
//!
#![doc = "VitalPath - health coaching study client"]
#![doc = "Main entry point for the vitalpath command."]

use std::process::ExitCode;

use colored::Colorize;

use vitalpath::cli::{Cli, Commands};
use vitalpath::commands;
use vitalpath::config::Config;
use vitalpath::error::Result;
use vitalpath::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse_args();

    if let Err(e) = init_logging(cli.verbose, cli.json_logs) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            if let Some(hint) = commands::error_hint(&e) {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Register { email, password } => {
            tracing::debug!("Starting registration");
            commands::auth::register(&config, &email, password).await
        }
        Commands::Login { email, password } => {
            tracing::debug!("Starting login");
            commands::auth::login(&config, &email, password).await
        }
        Commands::Logout => commands::auth::logout(&config),
        Commands::Status => commands::status::show_status(&config).await,
        Commands::Consent => commands::auth::consent(&config).await,
        Commands::Discovery { answers, fresh } => {
            if let Some(path) = &answers {
                tracing::debug!("Loading answers from: {}", path.display());
            }
            commands::discovery::run_discovery(config, answers, fresh).await
        }
        Commands::Dashboard { json } => commands::dashboard::show_dashboard(&config, json).await,
        Commands::Checkin { scores } => commands::dashboard::run_checkin(&config, scores).await,
        Commands::Goals => {
            commands::goals::list_goals();
            Ok(())
        }
    }
}

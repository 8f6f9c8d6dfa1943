use std::process::ExitCode;

use clap::Parser;
use divine_greetings::config::{AppConfig, setup_logging};
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    // a missing .env file is fine, the variables may already be set
    let _ = dotenvy::dotenv();

    let cli = divine_greetings::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return ExitCode::FAILURE;
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Configuration error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = divine_greetings::web::setup_server(&cli, config).await {
        error!("Application error: {}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

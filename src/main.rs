use anyhow::Result;
use clap::Parser;
use resume_tailor::cli::{handle_command, Cli};
use resume_tailor::core::{logging, ConfigManager};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.apply_to(ConfigManager::load()?);

    // Initialize logging before anything touches the store
    logging::init(&config.log_file());

    info!("Data directory: {}", config.environment.data_path.display());
    info!("Output directory: {}", config.environment.output_path.display());
    info!("Chat completion endpoint: {}", config.service.base_url);

    handle_command(cli.command, &config).await
}

use clap::Parser;
use dex_panel::cli::{Cli, Commands};
use dex_panel::core::{ClientError, Config};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Gate(args) => {
            dex_panel::cli::commands::gate::execute(args, config).await?;
        }
        Commands::Route(args) => {
            dex_panel::cli::commands::route::execute(args)?;
        }
        Commands::TokenList(args) => {
            dex_panel::cli::commands::token_list::execute(args, config).await?;
        }
    }

    Ok(())
}

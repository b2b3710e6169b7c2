use clap::Parser;
use log::error;
use sheet_poll::commands::{self, Cli};
use sheet_poll::config::Config;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load();

    if let Err(e) = commands::run(cli, config).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

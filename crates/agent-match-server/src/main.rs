use agent_match_server::config::ServerConfig;
use anyhow::{Context, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Variables already set in the environment take precedence over .env
    dotenv::dotenv().ok();

    // Load configuration from environment variables
    let config = ServerConfig::load()
        .context("Failed to load configuration")?;

    // Run the server using the library's run function
    agent_match_server::run(config).await
        .context("Server error")?;

    Ok(())
}

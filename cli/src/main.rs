use anyhow::Result;
use okinawa_core::ChatConfig;
use okinawa_tui::utils::logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = ChatConfig::from_env()?;
    logging::init(&config)?;
    info!(
        "Starting Okinawa Go CLI (max {} steps, {})",
        config.max_steps,
        config.api_url.as_ref().map(|u| u.as_str()).unwrap_or("offline")
    );

    // For now the CLI always runs the interactive client
    okinawa_tui::launch(config).await?;

    info!("Okinawa Go CLI shutting down");
    Ok(())
}

use anyhow::Result;
use okinawa_core::ChatConfig;
use okinawa_tui::utils::logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Optional: load .env (ignore errors if missing)
    let _ = dotenvy::dotenv();

    let config = ChatConfig::from_env()?;
    logging::init(&config)?;
    info!("Starting Okinawa Go TUI");

    okinawa_tui::launch(config).await?;

    info!("Okinawa Go TUI shutting down");
    Ok(())
}

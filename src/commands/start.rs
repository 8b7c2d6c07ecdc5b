use anyhow::Result;
use colored::Colorize;
use freight_quote::{config::Config, server};

/// Execute the start command
pub async fn execute(cfg: Config) -> Result<()> {
    println!(
        "{} {}:{}",
        "Starting freight quote service on".green(),
        cfg.server.host,
        cfg.server.port
    );

    server::start_server(cfg).await
}

use anyhow::Result;
use colored::Colorize;
use freight_quote::{config, store::Store};
use std::path::Path;
use tracing::info;

/// Execute the migrate command
///
/// Opening the store applies any pending migrations.
pub async fn execute(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    info!(database = %cfg.database.path, "Applying migrations");

    let store = Store::connect(&cfg.database).await?;
    let settings = store.get_active_cost_settings().await?;

    println!("{}", "✓ Database is up to date".green());
    println!("  {}: {}", "Database".cyan(), cfg.database.path);
    println!("  {}: {}", "Cost settings version".cyan(), settings.version);
    Ok(())
}

use anyhow::Result;
use colored::Colorize;
use freight_quote::config;
use std::path::Path;
use tracing::info;

/// Execute the test command
///
/// This validates the configuration file without starting the server
pub fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Testing configuration...".yellow());
    info!(path = %config_path.display(), "Loading and validating configuration");

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration test successful".green());
    println!();

    println!("{}", "Configuration Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Log Level".cyan(), cfg.server.log_level);
    println!("  {}: {}", "Log Format".cyan(), cfg.server.log_format);
    println!(
        "  {}: {} (max {} connections)",
        "Database".cyan(),
        cfg.database.path,
        cfg.database.max_connections
    );
    println!("  {}: {}", "Default Margin".cyan(), cfg.pricing.default_margin);
    println!("  {}: {}", "CORS Origins".cyan(), cfg.cors.allowed_origins.join(", "));

    info!("Configuration validation completed successfully");
    Ok(())
}

use anyhow::Result;
use freight_quote::config;
use std::path::Path;

/// Print the effective configuration after file and environment layering
pub fn show(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    print!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}

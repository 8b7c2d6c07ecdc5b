use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use freight_quote::{config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    match args.get_command() {
        cli::Commands::Start => {
            let cfg = config::load_config(&args.config)?;
            init_tracing(&cfg.server.log_level, &cfg.server.log_format);
            commands::start::execute(cfg).await?;
        }
        cli::Commands::Test => {
            init_tracing("info", "text");
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Migrate => {
            init_tracing("info", "text");
            commands::migrate::execute(&args.config).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
        },
        cli::Commands::Version => {
            println!("Freight Quote v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

use chonker_reader::chat::EchoAssistant;
use chonker_reader::cli::{self, Cli, Commands};
use chonker_reader::config::ReaderConfig;
use chonker_reader::logging::{cleanup_old_logs, init_logging, log_system_info, ConsoleOutput};
use chonker_reader::ReaderApp;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ReaderConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    // The viewer owns the terminal, so console logging would scribble over it
    let console = match &cli.command {
        #[cfg(feature = "tui")]
        Commands::View { .. } => ConsoleOutput::Silent,
        _ => ConsoleOutput::Stderr,
    };
    let _guard = init_logging(&config.logging, console)?;
    log_system_info();
    if let Err(e) = cleanup_old_logs(&config.logging) {
        warn!("Failed to clean up old logs: {}", e);
    }

    match cli.command {
        #[cfg(feature = "tui")]
        Commands::View { file, page } => {
            if let Some(page) = page {
                config.viewer.start_page = page.max(1);
            }
            let app = ReaderApp::new(config, Arc::new(EchoAssistant));
            chonker_reader::tui::run_viewer(app, file).await?;
        }
        Commands::Extract { file, page, json } => {
            cli::extract_command(file, page, json).await?;
        }
        Commands::Info { file } => {
            cli::info_command(file).await?;
        }
    }

    info!("👋 Done");
    Ok(())
}

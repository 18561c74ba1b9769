//! Cravt - terminal chat client
//!
//! Main entry point for the Cravt application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cravt::cli::{Cli, Commands};
use cravt::commands;
use cravt::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            tracing::info!("Starting interactive chat");
            commands::chat::run_chat(config).await
        }
        Commands::Send { message, new } => {
            tracing::info!("Sending single message");
            commands::send::run_send(config, message, new).await
        }
        Commands::List => commands::list::run_list(config),
        Commands::Export { id, output } => {
            tracing::info!("Exporting chat to {}", output.display());
            commands::export::run_export(config, id, output)
        }
        Commands::Delete { id, yes } => commands::delete::run_delete(config, id, yes),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with rendered chat output.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "cravt=debug" } else { "cravt=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

use clap::Parser;
use lovequote_rs::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = lovequote_rs::pkg_version(),
        app = %settings.application.name,
        "Starting"
    );

    if let Err(e) = execute_command(&cli, settings).await {
        tracing::error!(error = %e, "Run failed");
        return Err(e.into());
    }

    Ok(())
}

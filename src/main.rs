use anyhow::Context;
use books_api::core::ConfigProvider;
use books_api::utils::{logger, validation::Validate};
use books_api::{BookServer, CliConfig, TomlConfig};
use clap::Parser;

async fn serve<C: ConfigProvider + Validate>(config: C) -> anyhow::Result<()> {
    config.validate().context("invalid configuration")?;

    tracing::info!(
        "Store: {:?} ({}/{}.{}), request timeout {:?}",
        config.store_kind(),
        config.store_uri(),
        config.database_name(),
        config.collection_name(),
        config.request_timeout()
    );

    let server = BookServer::from_config(&config)
        .await
        .context("failed to set up the books server")?;
    server.start().await.context("server error")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            let file_config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            logger::init_server_logger(
                cli.verbose || file_config.verbose(),
                cli.json_logs || file_config.json_logs(),
            );
            tracing::info!("Starting books-api with {}", path.display());
            serve(file_config).await
        }
        None => {
            logger::init_server_logger(cli.verbose, cli.json_logs);
            tracing::info!("Starting books-api");
            if cli.verbose {
                tracing::debug!("CLI config: {:?}", cli);
            }
            serve(cli).await
        }
    }
}

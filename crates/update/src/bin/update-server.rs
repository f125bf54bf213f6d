//! update-server — comic ingestion service.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use comicseek_update::service::UpdateService;
use comicseek_update::storage::Storage;
use comicseek_update::xkcd::XkcdClient;
use comicseek_words::WordsClient;

/// Discovers missing comics, fetches and normalizes them, persists rows.
#[derive(Parser, Debug)]
#[command(name = "update-server", version, about)]
struct Cli {
    /// Path to a YAML config file. Environment variables are used when absent.
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<std::path::PathBuf>,

    /// Override the bind address.
    #[arg(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    comicseek_core::config::load_dotenv();
    let cli = Cli::parse();
    let config = comicseek_core::Config::load(cli.config.as_deref())?;
    let address = cli.address.unwrap_or_else(|| config.update.address.clone());

    let storage = Storage::connect(config.postgres.database_url()?).await?;
    let xkcd = XkcdClient::new(
        &config.update.xkcd_url,
        Duration::from_secs(config.update.fetch_timeout_secs),
    )?;
    let words = WordsClient::new(&config.update.words_url);
    let service = Arc::new(UpdateService::new(
        Arc::new(storage),
        Arc::new(xkcd),
        Arc::new(words),
        config.update.concurrency,
    )?);

    let app = comicseek_update::api::router(service);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("update service listening on {address}");
    axum::serve(listener, app).await?;
    Ok(())
}

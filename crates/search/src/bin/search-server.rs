//! search-server — ranked keyword search service.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use comicseek_search::rebuild::IndexTicker;
use comicseek_search::service::SearchService;
use comicseek_search::storage::Storage;
use comicseek_words::WordsClient;

/// Serves storage-backed and index-backed searches; rebuilds the in-memory
/// index on a timer.
#[derive(Parser, Debug)]
#[command(name = "search-server", version, about)]
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
    let address = cli.address.unwrap_or_else(|| config.search.address.clone());

    let storage = Storage::connect(config.postgres.database_url()?).await?;
    let words = WordsClient::new(&config.search.words_url);
    let service = Arc::new(SearchService::new(Arc::new(storage), Arc::new(words)));

    let ticker = Arc::new(IndexTicker::new(
        Arc::clone(&service),
        Duration::from_secs(config.search.index_rebuild_secs),
    ));
    tokio::spawn({
        let ticker = Arc::clone(&ticker);
        async move { ticker.run().await }
    });

    let app = comicseek_search::api::router(service);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("search service listening on {address}");
    axum::serve(listener, app).await?;
    Ok(())
}

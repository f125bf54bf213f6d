//! gateway-server — public HTTP surface over the internal services.

use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use comicseek_gateway::ports::Pinger;
use comicseek_gateway::{build_router, Aaa, AppState};
use comicseek_search::SearchClient;
use comicseek_update::UpdateClient;
use comicseek_words::WordsClient;

/// Authenticates, rate-limits, and fans out to the words, search, and
/// update services.
#[derive(Parser, Debug)]
#[command(name = "gateway-server", version, about)]
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
    let gateway = &config.gateway;
    let address = cli.address.unwrap_or_else(|| gateway.address.clone());

    let words = Arc::new(WordsClient::new(&gateway.words_url));
    let search = Arc::new(SearchClient::new(&gateway.search_url));
    let update = Arc::new(UpdateClient::new(&gateway.update_url));

    let mut pingers: HashMap<&'static str, Arc<dyn Pinger>> = HashMap::new();
    pingers.insert("words", words);
    pingers.insert("search", Arc::clone(&search) as Arc<dyn Pinger>);
    pingers.insert("update", Arc::clone(&update) as Arc<dyn Pinger>);

    let state = Arc::new(AppState {
        aaa: Aaa::from_config(gateway)?,
        pingers,
        search,
        update,
    });

    let app = build_router(state, gateway.search_rps);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("gateway listening on {address}");
    axum::serve(listener, app).await?;
    Ok(())
}

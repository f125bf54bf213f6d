//! words-server — phrase normalization service.

use clap::Parser;
use tracing::info;

/// Stateless normalizer: phrase in, stem set out.
#[derive(Parser, Debug)]
#[command(name = "words-server", version, about)]
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
    let address = cli.address.unwrap_or(config.words.address);

    let app = comicseek_words::api::router();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("words service listening on {address}");
    axum::serve(listener, app).await?;
    Ok(())
}

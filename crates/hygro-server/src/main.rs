use clap::Parser;
use hygro_server::{config::AppConfig, logging};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;

    logging::init_tracing(&config.logging)?;
    tracing::info!("Starting hygro server with config: {}", args.config);

    hygro_server::run(config).await
}

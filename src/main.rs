use anyhow::Result;
use clap::Parser;
use researchflow::{cli, flow::launch};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = cli::Args::parse();
    let query = args.query.clone();
    let config = args.into_config()?;

    let default_level = if config.verbose { "researchflow=debug" } else { "researchflow=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    launch(&config, query).await
}

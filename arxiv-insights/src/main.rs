use anyhow::Context;
use arxiv_insights::{AppState, Args, Fetcher, GeminiAdapter, LlmAdapter, RetryPolicy};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_filter))
        .init();

    info!("Starting arXiv insights server");
    info!("Feed endpoint: {}", args.feed_url);

    let fetcher = Fetcher::new(args.fetch_config()).context("failed to build feed client")?;
    let adapter: Arc<dyn LlmAdapter> =
        Arc::new(GeminiAdapter::new(args.gemini_config()).context("failed to build Gemini client")?);
    info!("Using {}", adapter.adapter_name());

    let state = AppState::new(fetcher, adapter, RetryPolicy::default());

    let listener = TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;

    arxiv_insights::serve(listener, state).await?;

    info!("arXiv insights server stopped");
    Ok(())
}

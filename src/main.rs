use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use news_summarizer::{
    AppState,
    api::routes::create_router,
    cache::ResponseCache,
    config::Config,
    extract::PageExtractor,
    llm::GeminiClient,
    news::MediastackClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; missing API keys are fatal before we bind
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "news_summarizer=info".into()),
        )
        .init();

    let server_addr = config.server_addr;
    tracing::info!("Starting server on {}", server_addr);

    // Create application state
    let app_state = AppState {
        news: Arc::new(MediastackClient::new(&config)),
        summarizer: Arc::new(GeminiClient::new(&config)),
        extractor: Arc::new(PageExtractor),
        cache: Arc::new(ResponseCache::new()),
        config: Arc::new(config),
    };

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    // Start the server
    tracing::info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod news;

use std::sync::Arc;

use api::models::Summary;
use cache::ResponseCache;
use config::Config;
use extract::ArticleExtractor;
use llm::Summarizer;
use news::NewsProvider;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub news: Arc<dyn NewsProvider>,
    pub summarizer: Arc<dyn Summarizer>,
    pub extractor: Arc<dyn ArticleExtractor>,
    pub cache: Arc<ResponseCache<Vec<Summary>>>,
}

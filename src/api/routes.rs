use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::api::models::{SummariesResponse, Summary};
use crate::error::{AppError, Result};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/summaries", get(summaries_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn summaries_handler(State(state): State<AppState>) -> Result<Json<SummariesResponse>> {
    let pipeline_state = state.clone();
    let summaries = state
        .cache
        .get_or_compute(|| compute_summaries(pipeline_state))
        .await?;

    Ok(Json(SummariesResponse { summaries }))
}

/// Full cache-miss pipeline: fetch the headlines, then summarize each one
/// in provider order. A summarizer failure aborts the whole run; extraction
/// failures only downgrade the prompt to the headline text.
async fn compute_summaries(state: AppState) -> Result<Vec<Summary>> {
    let headlines = state.news.fetch_headlines().await?;
    info!("fetched {} headlines", headlines.len());

    if headlines.is_empty() {
        return Err(AppError::NotFound("No articles found.".to_string()));
    }

    let mut summaries = Vec::with_capacity(headlines.len());
    for headline in headlines {
        let article_text = match state.extractor.extract(&headline.url).await {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(url = %headline.url, "article extraction failed, summarizing headline only: {}", err);
                None
            }
        };

        let summary = state
            .summarizer
            .summarize(&headline, article_text.as_deref())
            .await?;

        summaries.push(Summary {
            title: headline.title,
            url: headline.url,
            summary,
        });
    }

    Ok(summaries)
}

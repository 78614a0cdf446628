use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};

/// Maximum number of headlines fetched per pipeline run.
pub const HEADLINE_LIMIT: usize = 10;

const MEDIASTACK_URL: &str = "http://api.mediastack.com/v1/news";

/// One news item as returned by the headline provider.
#[derive(Debug, Clone)]
pub struct Headline {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch the current top headlines, in provider order.
    async fn fetch_headlines(&self) -> Result<Vec<Headline>>;
}

#[derive(Deserialize)]
struct NewsResponse {
    data: Vec<Article>,
}

// Articles without a title or url are malformed; a missing description is
// normal and decodes to an empty string.
#[derive(Deserialize)]
struct Article {
    title: String,
    #[serde(default)]
    description: Option<String>,
    url: String,
}

pub struct MediastackClient {
    client: Client,
    access_key: String,
    countries: String,
    languages: String,
}

impl MediastackClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        MediastackClient {
            client,
            access_key: config.mediastack_api_key.clone(),
            countries: config.news_country.clone(),
            languages: config.news_language.clone(),
        }
    }
}

#[async_trait]
impl NewsProvider for MediastackClient {
    async fn fetch_headlines(&self) -> Result<Vec<Headline>> {
        let limit = HEADLINE_LIMIT.to_string();
        let response = self
            .client
            .get(MEDIASTACK_URL)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("countries", self.countries.as_str()),
                ("languages", self.languages.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::FetchError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::FetchError(format!(
                "news API returned status {}",
                status
            )));
        }

        let payload: NewsResponse = response
            .json()
            .await
            .map_err(|e| AppError::FetchError(format!("malformed news payload: {}", e)))?;

        Ok(to_headlines(payload))
    }
}

fn to_headlines(payload: NewsResponse) -> Vec<Headline> {
    payload
        .data
        .into_iter()
        .take(HEADLINE_LIMIT)
        .map(|article| Headline {
            title: article.title,
            description: article.description.unwrap_or_default(),
            url: article.url,
        })
        .collect()
}

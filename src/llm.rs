use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::news::Headline;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a short summary for one headline. `article_text` carries the
    /// extracted page content when available; without it the prompt falls
    /// back to the headline itself.
    async fn summarize(&self, headline: &Headline, article_text: Option<&str>) -> Result<String>;
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");

        GeminiClient {
            client,
            api_key: config.gemini_api_key.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, headline: &Headline, article_text: Option<&str>) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(headline, article_text),
                }],
            }],
        };

        let url = format!("{}/models/{}:generateContent", GEMINI_BASE_URL, GEMINI_MODEL);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::SummarizeError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::SummarizeError(format!(
                "Gemini API returned status {}",
                status
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::SummarizeError(e.to_string()))?;

        extract_summary(&json)
    }
}

fn extract_summary(json: &serde_json::Value) -> Result<String> {
    let text = json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| AppError::SummarizeError("Invalid response format from Gemini".to_string()))?
        .trim()
        .to_string();

    if text.is_empty() {
        return Err(AppError::SummarizeError(
            "Gemini returned an empty summary".to_string(),
        ));
    }

    Ok(text)
}

/// Builds the summarization prompt. Prefers the extracted article text;
/// falls back to title + description, or the title alone when the
/// description is empty.
pub fn build_prompt(headline: &Headline, article_text: Option<&str>) -> String {
    let article = article_text.map(str::trim).filter(|text| !text.is_empty());

    let body = match article {
        Some(text) => text.to_string(),
        None => {
            let description = headline.description.trim();
            if description.is_empty() {
                headline.title.clone()
            } else {
                format!("{}\n\n{}", headline.title, description)
            }
        }
    };

    let mut prompt = String::with_capacity(body.len() + 90);
    prompt.push_str("Summarize the following article in 60 words or less, maintaining key information:\n\n");
    prompt.push_str(&body);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headline(description: &str) -> Headline {
        Headline {
            title: "Markets rally".to_string(),
            description: description.to_string(),
            url: "https://example.com/markets".to_string(),
        }
    }

    #[test]
    fn prompt_prefers_article_text() {
        let prompt = build_prompt(&headline("short blurb"), Some("full article body"));
        assert!(prompt.ends_with("full article body"));
        assert!(!prompt.contains("short blurb"));
    }

    #[test]
    fn prompt_falls_back_to_title_and_description() {
        let prompt = build_prompt(&headline("short blurb"), None);
        assert!(prompt.contains("Markets rally"));
        assert!(prompt.ends_with("short blurb"));
    }

    #[test]
    fn prompt_uses_title_alone_when_description_empty() {
        let prompt = build_prompt(&headline("  "), Some("   "));
        assert!(prompt.ends_with("Markets rally"));
    }

    #[test]
    fn extracts_and_trims_summary_text() {
        let response = json!({
            "candidates": [{
                "content": {"parts": [{"text": "  A concise summary.\n"}]}
            }]
        });
        assert_eq!(extract_summary(&response).unwrap(), "A concise summary.");
    }

    #[test]
    fn rejects_malformed_response() {
        let response = json!({"candidates": []});
        assert!(extract_summary(&response).is_err());
    }

    #[test]
    fn rejects_blank_summary() {
        let response = json!({
            "candidates": [{
                "content": {"parts": [{"text": "   "}]}
            }]
        });
        assert!(extract_summary(&response).is_err());
    }
}

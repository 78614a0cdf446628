use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use scraper::{Html, Selector};

use crate::error::{AppError, Result};

/// Upper bound on extracted article text, to keep prompts a sane size.
const MAX_ARTICLE_CHARS: usize = 12_000;

// Some news sites refuse requests without a browser-like User-Agent
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

// Create a static selector to avoid recompiling it each time
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    /// Fetch the article page and return its readable text.
    async fn extract(&self, url: &str) -> Result<String>;
}

pub struct PageExtractor;

#[async_trait]
impl ArticleExtractor for PageExtractor {
    async fn extract(&self, url: &str) -> Result<String> {
        let response = CLIENT
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExtractError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ExtractError(format!(
                "article page returned status {}",
                status
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::ExtractError(e.to_string()))?;

        extract_text(&html)
            .ok_or_else(|| AppError::ExtractError("no readable text in article page".to_string()))
    }
}

/// Collects paragraph text from an HTML document, whitespace-normalized and
/// capped at `MAX_ARTICLE_CHARS`.
pub fn extract_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let mut text = String::new();
    for paragraph in document.select(&PARAGRAPH_SELECTOR) {
        for chunk in paragraph.text() {
            for word in chunk.split_whitespace() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(word);
            }
        }
        if text.len() >= MAX_ARTICLE_CHARS {
            break;
        }
    }

    if text.is_empty() {
        return None;
    }

    if text.len() > MAX_ARTICLE_CHARS {
        let mut cut = MAX_ARTICLE_CHARS;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }

    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_paragraph_text_in_order() {
        let html = r#"
            <html><body>
                <script>var tracking = true;</script>
                <h1>Ignored heading</h1>
                <p>First   paragraph.</p>
                <p>Second
                paragraph.</p>
            </body></html>
        "#;

        let text = extract_text(html).unwrap();
        assert_eq!(text, "First paragraph. Second paragraph.");
    }

    #[test]
    fn page_without_paragraphs_yields_none() {
        let html = "<html><body><div>nav nav nav</div></body></html>";
        assert!(extract_text(html).is_none());
    }

    #[test]
    fn long_articles_are_capped() {
        let paragraph = format!("<p>{}</p>", "word ".repeat(5_000));
        let html = format!("<html><body>{paragraph}{paragraph}</body></html>");

        let text = extract_text(&html).unwrap();
        assert!(text.len() <= MAX_ARTICLE_CHARS);
    }
}

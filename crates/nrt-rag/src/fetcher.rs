//! HTTP article fetcher

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use nrt_core::{ArticleFetcher, Document, Error, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches article pages over HTTP and extracts their readable text.
pub struct HttpArticleFetcher {
    client: Client,
}

impl HttpArticleFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("nrt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

/// Extract readable article text from an HTML page: headings, paragraphs,
/// list items, and quotes, joined by blank lines.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut blocks = Vec::new();

    let selectors = ["h1", "h2", "h3", "p", "li", "blockquote"];

    for selector_str in &selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                let text = element
                    .text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");

                if !text.is_empty() {
                    blocks.push(text);
                }
            }
        }
    }

    blocks.dedup();
    blocks.join("\n\n")
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<Document> {
        Url::parse(url).map_err(|e| Error::Fetch {
            url: url.to_string(),
            message: format!("invalid URL: {}", e),
        })?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                message: format!("HTTP status {}", response.status()),
            });
        }

        let html = response.text().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let text = extract_text(&html);

        if text.is_empty() {
            return Err(Error::Fetch {
                url: url.to_string(),
                message: "no article text found on page".to_string(),
            });
        }

        Ok(Document::new(url, text))
    }
}

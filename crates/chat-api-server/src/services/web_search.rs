use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SearchConfig;

/// Context string used when a search produced nothing.
pub const NO_SEARCH_RESULTS: &str = "No search results found.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebSearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<WebSearchResult>,
}

impl SearchResponse {
    pub fn empty(query: &str) -> Self {
        Self {
            query: query.to_string(),
            results: Vec::new(),
        }
    }
}

/// Web search used to ground replies.
///
/// Implementations never fail: any internal error yields an empty result
/// list, so callers treat "no results" and "search failed" the same way.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> SearchResponse;
}

/// Renders results as the context block handed to the model.
pub fn format_search_results(response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return NO_SEARCH_RESULTS.to_string();
    }

    let mut formatted = format!("Search results for \"{}\":\n\n", response.query);
    for (index, result) in response.results.iter().enumerate() {
        formatted.push_str(&format!("{}. {}\n", index + 1, result.title));
        formatted.push_str(&format!("   {}\n", result.snippet));
        formatted.push_str(&format!("   URL: {}\n\n", result.url));
    }
    formatted
}

// ===== DUCKDUCKGO =====

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
    #[serde(rename = "FirstURL", default)]
    first_url: Option<String>,
}

impl RelatedTopic {
    fn into_result(self) -> WebSearchResult {
        let text = self.text.filter(|t| !t.is_empty());
        let title = text
            .as_deref()
            .and_then(|t| t.split(" - ").next())
            .filter(|t| !t.is_empty())
            .unwrap_or("Search Result")
            .to_string();

        WebSearchResult {
            title,
            url: self.first_url.unwrap_or_default(),
            snippet: text.unwrap_or_else(|| "No description available".to_string()),
        }
    }
}

/// DuckDuckGo instant answer API.
#[derive(Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    config: SearchConfig,
}

impl DuckDuckGoSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    async fn fetch(&self, query: &str) -> anyhow::Result<Vec<WebSearchResult>> {
        let url = Url::parse_with_params(
            &self.config.base_url,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
        )?;

        let response = self.client.get(url).send().await?.error_for_status()?;
        let answer: InstantAnswer = response.json().await?;

        Ok(answer
            .related_topics
            .into_iter()
            .take(self.config.max_results)
            .map(RelatedTopic::into_result)
            .collect())
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> SearchResponse {
        match self.fetch(query).await {
            Ok(results) => {
                debug!(results = results.len(), "Web search completed");
                SearchResponse {
                    query: query.to_string(),
                    results,
                }
            }
            Err(e) => {
                warn!("Web search failed, continuing without results: {}", e);
                SearchResponse::empty(query)
            }
        }
    }
}

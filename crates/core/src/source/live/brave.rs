//! Brave web search API provider (listed as "Bravo Search").

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;

use crate::source::{SourceError, SourceId};

use super::{check_status, map_request_error, Credentials, LiveProvider, WebHit};

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/res/v1/web/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<WebResult>,
}

#[derive(Debug, Deserialize)]
struct WebResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    page_age: Option<String>,
}

pub struct BraveProvider {
    client: Client,
    base_url: String,
    max_results: usize,
}

impl BraveProvider {
    pub fn new(client: Client, max_results: usize) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL, max_results)
    }

    pub fn with_base_url(client: Client, base_url: &str, max_results: usize) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            max_results,
        }
    }
}

/// `page_age` is an ISO timestamp, with or without an offset.
fn parse_page_age(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Plain text of an HTML fragment. Titles and descriptions carry
/// `<strong>` highlight markup and character entities.
fn fragment_text(text: &str) -> String {
    Html::parse_fragment(text)
        .root_element()
        .text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn parse_response(body: &str) -> Result<Vec<WebHit>, SourceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Format(e.to_string()))?;
    let results = response.web.map(|w| w.results).unwrap_or_default();
    Ok(results
        .into_iter()
        .filter(|r| !r.title.is_empty())
        .map(|r| WebHit {
            title: fragment_text(&r.title),
            url: r.url,
            snippet: fragment_text(&r.description),
            published: r.page_age.as_deref().and_then(parse_page_age),
        })
        .collect())
}

#[async_trait]
impl LiveProvider for BraveProvider {
    fn id(&self) -> SourceId {
        SourceId::Bravo
    }

    async fn lookup(&self, query: &str, credentials: &Credentials) -> Result<Vec<WebHit>, SourceError> {
        let token = credentials.get("BRAVO_API_KEY").cloned().unwrap_or_default();
        let count = self.max_results.clamp(1, 20).to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("count", count.as_str())])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", token)
            .send()
            .await
            .map_err(map_request_error)?;
        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(map_request_error)?;

        parse_response(&body)
    }
}

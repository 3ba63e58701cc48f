//! Google Custom Search JSON API provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::source::{SourceError, SourceId};

use super::{check_status, map_request_error, Credentials, LiveProvider, WebHit};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The API returns at most 10 items per page.
const PAGE_SIZE: usize = 10;
const MAX_PAGES: usize = 2;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

pub struct GoogleProvider {
    client: Client,
    base_url: String,
    max_results: usize,
    request_delay: Duration,
}

impl GoogleProvider {
    pub fn new(client: Client, max_results: usize, request_delay: Duration) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL, max_results, request_delay)
    }

    pub fn with_base_url(
        client: Client,
        base_url: &str,
        max_results: usize,
        request_delay: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            max_results,
            request_delay,
        }
    }

    async fn fetch_page(
        &self,
        query: &str,
        credentials: &Credentials,
        start: usize,
        num: usize,
    ) -> Result<Vec<WebHit>, SourceError> {
        let key = credentials.get("GOOGLE_API_KEY").map(String::as_str).unwrap_or_default();
        let cx = credentials.get("GOOGLE_CSE_ID").map(String::as_str).unwrap_or_default();
        let start = start.to_string();
        let num = num.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", key),
                ("cx", cx),
                ("q", query),
                ("start", start.as_str()),
                ("num", num.as_str()),
            ])
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

pub(super) fn parse_response(body: &str) -> Result<Vec<WebHit>, SourceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Format(e.to_string()))?;
    Ok(response
        .items
        .into_iter()
        .filter(|item| !item.title.is_empty())
        .map(|item| WebHit {
            title: item.title,
            url: item.link,
            snippet: item.snippet,
            published: None,
        })
        .collect())
}

#[async_trait]
impl LiveProvider for GoogleProvider {
    fn id(&self) -> SourceId {
        SourceId::Google
    }

    async fn lookup(&self, query: &str, credentials: &Credentials) -> Result<Vec<WebHit>, SourceError> {
        let wanted = self.max_results.clamp(1, PAGE_SIZE * MAX_PAGES);
        let mut hits = Vec::new();

        for page in 0..MAX_PAGES {
            if hits.len() >= wanted {
                break;
            }
            if page > 0 {
                tokio::time::sleep(self.request_delay).await;
            }
            let num = (wanted - hits.len()).min(PAGE_SIZE);
            let batch = self
                .fetch_page(query, credentials, page * PAGE_SIZE + 1, num)
                .await?;
            debug!(page, count = batch.len(), "Google page fetched");
            let exhausted = batch.len() < num;
            hits.extend(batch);
            if exhausted {
                break;
            }
        }

        hits.truncate(wanted);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "kind": "customsearch#search",
            "items": [
                {"title": "Prêmio Off Flip", "link": "https://premio.example/off", "snippet": "Inscrições até 01/08/2026"},
                {"title": "", "link": "https://blank.example"},
                {"title": "Antologia Norte", "link": "https://antologia.example"}
            ]
        }"#;
        let hits = parse_response(body).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].url, "https://premio.example/off");
        assert_eq!(hits[1].snippet, "");
    }

    #[test]
    fn test_parse_response_without_items() {
        let hits = parse_response(r#"{"kind": "customsearch#search"}"#).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_parse_response_invalid() {
        assert!(matches!(parse_response("<html>"), Err(SourceError::Format(_))));
    }
}

//! Yahoo! HTML search provider.

use async_trait::async_trait;
use reqwest::Client;

use crate::source::{SourceError, SourceId};

use super::html::{parse_results, redirect_target, ResultSelectors};
use super::{check_status, map_request_error, Credentials, LiveProvider, WebHit};

const DEFAULT_BASE_URL: &str = "https://search.yahoo.com/search";

const SELECTORS: ResultSelectors = ResultSelectors {
    container: "div.algo",
    title: "h3 a",
    snippet: ".compText",
};

/// Scrapes the Yahoo! result page. No credentials needed.
pub struct YahooProvider {
    client: Client,
    base_url: String,
    max_results: usize,
}

impl YahooProvider {
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

/// Result links go through `r.search.yahoo.com/.../RU=<target>/RK=...`.
fn resolve_link(href: &str) -> String {
    redirect_target(href, "RU", &['/']).unwrap_or_else(|| href.to_string())
}

pub(super) fn parse_page(body: &str, limit: usize) -> Result<Vec<WebHit>, SourceError> {
    parse_results(body, &SELECTORS, limit, resolve_link)
}

#[async_trait]
impl LiveProvider for YahooProvider {
    fn id(&self) -> SourceId {
        SourceId::Yahoo
    }

    async fn lookup(&self, query: &str, _credentials: &Credentials) -> Result<Vec<WebHit>, SourceError> {
        let url = format!("{}?p={}", self.base_url, urlencoding::encode(query));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_request_error)?;
        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(map_request_error)?;

        parse_page(&body, self.max_results.min(5))
    }
}

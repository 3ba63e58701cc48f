//! DuckDuckGo HTML search provider.

use async_trait::async_trait;
use reqwest::Client;

use crate::source::{SourceError, SourceId};

use super::html::{parse_results, redirect_target, ResultSelectors};
use super::{check_status, map_request_error, Credentials, LiveProvider, WebHit};

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com/html/";

const SELECTORS: ResultSelectors = ResultSelectors {
    container: "div.result",
    title: "a.result__a",
    snippet: ".result__snippet",
};

/// Scrapes the DuckDuckGo HTML endpoint. No credentials needed.
pub struct DuckDuckGoProvider {
    client: Client,
    base_url: String,
    max_results: usize,
}

impl DuckDuckGoProvider {
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

/// Result links go through `/l/?uddg=<target>`.
fn resolve_link(href: &str) -> String {
    redirect_target(href, "uddg", &['&']).unwrap_or_else(|| href.to_string())
}

pub(super) fn parse_page(body: &str, limit: usize) -> Result<Vec<WebHit>, SourceError> {
    parse_results(body, &SELECTORS, limit, resolve_link)
}

#[async_trait]
impl LiveProvider for DuckDuckGoProvider {
    fn id(&self) -> SourceId {
        SourceId::DuckDuckGo
    }

    async fn lookup(&self, query: &str, _credentials: &Credentials) -> Result<Vec<WebHit>, SourceError> {
        let url = format!("{}?q={}", self.base_url, urlencoding::encode(query));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_resolves_redirects() {
        let body = r#"
            <div class="result">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fsecult.to.gov.br%2Fedital&amp;rut=1">Edital Secult</a>
              <a class="result__snippet">Prazo: 20/11/2026</a>
            </div>
        "#;
        let hits = parse_page(body, 5).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://secult.to.gov.br/edital");
        assert_eq!(hits[0].snippet, "Prazo: 20/11/2026");
    }
}

//! HTML result-page parsing for scraped providers.

use scraper::{ElementRef, Html, Selector};

use crate::source::SourceError;

use super::WebHit;

/// CSS selectors describing one provider's result page.
pub(super) struct ResultSelectors {
    pub container: &'static str,
    pub title: &'static str,
    pub snippet: &'static str,
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Format(format!("invalid selector {}: {:?}", css, e)))
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract up to `limit` hits. `resolve_link` maps the raw `href` to the
/// target URL (result pages often wrap links in redirects).
pub(super) fn parse_results(
    body: &str,
    selectors: &ResultSelectors,
    limit: usize,
    resolve_link: fn(&str) -> String,
) -> Result<Vec<WebHit>, SourceError> {
    let container = selector(selectors.container)?;
    let title = selector(selectors.title)?;
    let snippet = selector(selectors.snippet)?;

    let document = Html::parse_document(body);
    let mut hits = Vec::new();

    for result in document.select(&container) {
        if hits.len() >= limit {
            break;
        }
        let Some(title_elem) = result.select(&title).next() else {
            continue;
        };
        let title_text = collapsed_text(title_elem);
        if title_text.is_empty() {
            continue;
        }
        let href = title_elem.value().attr("href").unwrap_or_default();
        let snippet_text = result
            .select(&snippet)
            .next()
            .map(collapsed_text)
            .unwrap_or_default();

        hits.push(WebHit {
            title: title_text,
            url: resolve_link(href),
            snippet: snippet_text,
            published: None,
        });
    }

    Ok(hits)
}

/// Value of a query-string style parameter `name=` inside `href`, decoded.
pub(super) fn redirect_target(href: &str, name: &str, terminators: &[char]) -> Option<String> {
    let marker = format!("{}=", name);
    let start = href.find(&marker)? + marker.len();
    let rest = &href[start..];
    let end = rest.find(|c| terminators.contains(&c)).unwrap_or(rest.len());
    urlencoding::decode(&rest[..end]).ok().map(|s| s.into_owned())
}

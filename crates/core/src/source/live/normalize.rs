//! Normalization of raw web hits into canonical listings.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::eligibility::RegionProfile;
use crate::opportunity::{OpportunityType, RawOpportunity};
use crate::source::SourceId;

use super::WebHit;

/// Known issuers, matched against the hit URL.
const KNOWN_ISSUERS: &[(&str, &str)] = &[
    ("secult.to.gov.br", "Secretaria de Cultura - TO"),
    ("funarte.gov.br", "Funarte"),
    ("bn.gov.br", "Fundação Biblioteca Nacional"),
    ("cultura.gov.br", "Ministério da Cultura"),
    ("itaucultural.org.br", "Itaú Cultural"),
    ("sesc", "SESC"),
];

/// Brazilian state codes.
const STATE_CODES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

const NATIONWIDE_LOCATION: &str = "Nacional (todos os estados)";
const STATE_SPECIFIC_LOCATION: &str = "Específico por estado";

static DEADLINE_AFTER_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:inscrições até|até|prazo|deadline|encerra|termina)\s*:?\s*(?:em\s+|o dia\s+|dia\s+)?(\d{1,2})[/-](\d{1,2})[/-](\d{4})",
    )
    .unwrap()
});

static DEADLINE_LONG_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2})\s+de\s+([^\s\d]+)\s+de\s+(\d{4})").unwrap());

/// Extract a deadline from free text.
///
/// Recognizes `dd/mm/yyyy` (or `dd-mm-yyyy`) after a deadline keyword, and
/// the long Portuguese form "15 de março de 2026".
pub fn extract_deadline(text: &str) -> Option<DateTime<Utc>> {
    for caps in DEADLINE_AFTER_KEYWORD.captures_iter(text) {
        let day = caps[1].parse().ok();
        let month = caps[2].parse().ok();
        let year = caps[3].parse().ok();
        if let Some(date) = to_date(year, month, day) {
            return Some(date);
        }
    }

    for caps in DEADLINE_LONG_FORM.captures_iter(text) {
        let day = caps[1].parse().ok();
        let month = month_number(&caps[2]);
        let year = caps[3].parse().ok();
        if let Some(date) = to_date(year, month, day) {
            return Some(date);
        }
    }

    None
}

fn to_date(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year?, month?, day?)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().as_str() {
        "janeiro" => 1,
        "fevereiro" => 2,
        "março" | "marco" => 3,
        "abril" => 4,
        "maio" => 5,
        "junho" => 6,
        "julho" => 7,
        "agosto" => 8,
        "setembro" => 9,
        "outubro" => 10,
        "novembro" => 11,
        "dezembro" => 12,
        _ => return None,
    };
    Some(month)
}

/// Guess the opportunity type from a result title.
pub fn kind_from_title(title: &str) -> OpportunityType {
    let title = title.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| title.contains(w));

    if has(&["concurso", "competição"]) {
        OpportunityType::ContestLiterary
    } else if has(&["chamada pública", "chamamento público"]) {
        OpportunityType::PublicCall
    } else if has(&["edital", "chamada"]) {
        OpportunityType::CulturalCall
    } else if has(&["prêmio", "premio", "premiação"]) {
        OpportunityType::Award
    } else if has(&["festival", "festa literária", "flip"]) {
        OpportunityType::Festival
    } else if has(&["antologia", "coletânea"]) {
        OpportunityType::Anthology
    } else {
        OpportunityType::Other
    }
}

fn issuer_from_url(url: &str) -> String {
    let url = url.to_lowercase();
    KNOWN_ISSUERS
        .iter()
        .find(|(host, _)| url.contains(host))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| "Site não identificado".to_string())
}

/// Location and declared eligibility guessed from the snippet.
fn location_from_snippet(snippet: &str, region: &RegionProfile) -> (String, Option<bool>) {
    if region.mentions_target(snippet) {
        return (region.name.clone(), None);
    }

    let region_code = region.code.to_uppercase();
    let other_state = snippet
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word != region_code && STATE_CODES.contains(&word));

    if other_state {
        (STATE_SPECIFIC_LOCATION.to_string(), Some(false))
    } else {
        (NATIONWIDE_LOCATION.to_string(), None)
    }
}

/// Build a canonical listing from a live web hit.
pub(super) fn hit_to_raw(hit: WebHit, id: SourceId, region: &RegionProfile) -> RawOpportunity {
    let (location, declared_eligible) = location_from_snippet(&hit.snippet, region);
    let description = if hit.snippet.trim().is_empty() {
        "Descrição não disponível".to_string()
    } else {
        hit.snippet.trim().to_string()
    };
    let url = Some(hit.url.trim().to_string()).filter(|u| !u.is_empty());
    let citation = format!(
        "Resultado obtido via {} - verificar informações no site oficial: {}",
        id.label(),
        url.as_deref().unwrap_or(crate::opportunity::URL_UNAVAILABLE)
    );

    RawOpportunity {
        search_engine: id.label().to_string(),
        kind: kind_from_title(&hit.title),
        source: issuer_from_url(&hit.url),
        deadline: extract_deadline(&hit.snippet),
        title: hit.title,
        description,
        location,
        published_date: hit.published,
        url,
        declared_eligible,
        is_synthetic: false,
        citation: Some(citation),
    }
}

/// Single placeholder listing returned when a live lookup yields nothing.
///
/// Its location is nation-wide so the default regional filter keeps it
/// and the disclaimer reaches the caller.
pub(super) fn placeholder(id: SourceId, reason: &str, now: DateTime<Utc>) -> RawOpportunity {
    RawOpportunity {
        search_engine: id.label().to_string(),
        title: format!("Resultados ao vivo indisponíveis - {}", id.label()),
        source: id.label().to_string(),
        kind: OpportunityType::Other,
        description: "Não foi possível obter dados ao vivo desta fonte. Consulte diretamente os sites oficiais de cultura.".to_string(),
        location: NATIONWIDE_LOCATION.to_string(),
        deadline: None,
        published_date: Some(now),
        url: None,
        declared_eligible: None,
        is_synthetic: true,
        citation: Some(format!(
            "Dados de demonstração: a busca em {} falhou ({})",
            id.label(),
            reason
        )),
    }
}

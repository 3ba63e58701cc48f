//! Synthetic demonstration source.
//!
//! Produces plausible listings drawn from fixed reference lists. Every
//! record is flagged `is_synthetic` and carries a citation saying so.

use async_trait::async_trait;
use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::opportunity::{OpportunityType, RawOpportunity};

use super::{SourceAdapter, SourceError, SourceId, SourceRequest};

const TITLES: &[&str] = &[
    "Concurso Nacional de Contos Brasileiros",
    "Prêmio Literário Amazônia",
    "Festival de Poesia do Cerrado",
    "Edital de Apoio à Literatura Regional",
    "Antologia Vozes do Norte",
    "Concurso de Crônicas Urbanas",
    "Prêmio Jovem Escritor Brasil",
    "Festival Nacional de Cordel",
    "Concurso de Literatura Infantil",
    "Prêmio de Poesia Contemporânea",
];

const ISSUERS: &[&str] = &[
    "Ministério da Cultura",
    "Fundação Cultural Palmares",
    "Instituto Brasileiro de Museus",
    "Secretaria de Cultura do Tocantins",
    "Fundação Cultural do Tocantins",
    "Editora Moderna",
    "Academia Brasileira de Letras",
    "Fundação Biblioteca Nacional",
    "SESC Nacional",
    "Itaú Cultural",
];

const LOCATIONS: &[&str] = &[
    "Palmas, TO",
    "Araguaína, TO",
    "Gurupi, TO",
    "Nacional (todos os estados)",
    "Região Norte",
    "Brasília, DF",
    "São Paulo, SP",
    "Rio de Janeiro, RJ",
    "Belo Horizonte, MG",
    "Salvador, BA",
];

const TYPES: &[OpportunityType] = &[
    OpportunityType::ContestLiterary,
    OpportunityType::CulturalCall,
    OpportunityType::Anthology,
    OpportunityType::Festival,
    OpportunityType::Award,
    OpportunityType::PublicCall,
];

const DESCRIPTIONS: &[&str] = &[
    "Concurso aberto para escritores de todo o Brasil com temática livre",
    "Edital para apoio à produção literária regional com foco na cultura local",
    "Festival que celebra a diversidade da literatura brasileira",
    "Prêmio destinado a jovens talentos da literatura nacional",
    "Chamada para participação em antologia de autores contemporâneos",
    "Concurso de contos com temática voltada para a preservação ambiental",
    "Edital para publicação de obras de autores estreantes",
    "Festival que promove a cultura popular através da literatura",
    "Prêmio para obras que retratam a realidade do interior brasileiro",
    "Concurso de poesia com temática sobre identidade cultural",
];

/// Source adapter producing randomized demonstration listings.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    id: SourceId,
    min_results: u32,
    max_results: u32,
}

impl SyntheticSource {
    /// Synthetic adapter with the result-count range used for `id`.
    pub fn new(id: SourceId) -> Self {
        let (min_results, max_results) = match id {
            SourceId::Google => (3, 7),
            SourceId::You => (2, 5),
            SourceId::Perplexity => (2, 6),
            SourceId::Bing | SourceId::DuckDuckGo => (2, 4),
            _ => (2, 5),
        };
        Self {
            id,
            min_results,
            max_results,
        }
    }

    /// Override the result-count range (inclusive).
    pub fn with_range(mut self, min_results: u32, max_results: u32) -> Self {
        self.min_results = min_results.min(max_results);
        self.max_results = max_results.max(min_results);
        self
    }

    fn rng(&self, request: &SourceRequest) -> StdRng {
        match request.seed {
            // Mix in the source so two sources with the same seed differ.
            Some(seed) => StdRng::seed_from_u64(
                seed ^ (self.id.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15),
            ),
            None => StdRng::from_os_rng(),
        }
    }

    fn generate(&self, request: &SourceRequest) -> Vec<RawOpportunity> {
        let mut rng = self.rng(request);
        let count = rng.random_range(self.min_results..=self.max_results);

        (0..count)
            .map(|i| {
                let deadline_days: i64 = rng.random_range(1..=180);
                let published_days: i64 = rng.random_range(1..=30);

                RawOpportunity {
                    search_engine: self.id.label().to_string(),
                    title: pick(&mut rng, TITLES).to_string(),
                    source: pick(&mut rng, ISSUERS).to_string(),
                    kind: *pick(&mut rng, TYPES),
                    description: pick(&mut rng, DESCRIPTIONS).to_string(),
                    location: pick(&mut rng, LOCATIONS).to_string(),
                    deadline: Some(request.now + Duration::days(deadline_days)),
                    published_date: Some(request.now - Duration::days(published_days)),
                    url: Some(format!("https://example.com/opportunity/{}", i + 1)),
                    declared_eligible: None,
                    is_synthetic: true,
                    citation: Some(format!(
                        "Dados simulados ({}) para demonstração - não verificados",
                        self.id.label()
                    )),
                }
            })
            .collect()
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

#[async_trait]
impl SourceAdapter for SyntheticSource {
    fn id(&self) -> SourceId {
        self.id
    }

    async fn fetch(&self, request: &SourceRequest) -> Result<Vec<RawOpportunity>, SourceError> {
        Ok(self.generate(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn request(seed: u64) -> SourceRequest {
        SourceRequest::new("poesia", vec![])
            .with_now(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
            .with_seed(Some(seed))
    }

    #[tokio::test]
    async fn test_count_within_range() {
        let source = SyntheticSource::new(SourceId::Google);
        for seed in 0..20 {
            let results = source.fetch(&request(seed)).await.unwrap();
            assert!((3..=7).contains(&results.len()), "got {}", results.len());
        }
    }

    #[tokio::test]
    async fn test_dates_within_bounds() {
        let source = SyntheticSource::new(SourceId::Bing);
        let req = request(7);
        for item in source.fetch(&req).await.unwrap() {
            let deadline = item.deadline.unwrap();
            let published = item.published_date.unwrap();
            assert!(deadline >= req.now + Duration::days(1));
            assert!(deadline <= req.now + Duration::days(180));
            assert!(published <= req.now - Duration::days(1));
            assert!(published >= req.now - Duration::days(30));
        }
    }

    #[tokio::test]
    async fn test_records_are_labeled_synthetic() {
        let source = SyntheticSource::new(SourceId::Perplexity);
        for item in source.fetch(&request(3)).await.unwrap() {
            assert!(item.is_synthetic);
            assert!(item.citation.as_deref().unwrap().contains("simulados"));
            assert_eq!(item.search_engine, "Perplexity");
            assert!(item.declared_eligible.is_none());
            assert!(LOCATIONS.contains(&item.location.as_str()));
        }
    }

    #[tokio::test]
    async fn test_same_seed_is_deterministic() {
        let source = SyntheticSource::new(SourceId::You);
        let a = source.fetch(&request(42)).await.unwrap();
        let b = source.fetch(&request(42)).await.unwrap();
        let titles_a: Vec<_> = a.iter().map(|r| (&r.title, &r.location, r.deadline)).collect();
        let titles_b: Vec<_> = b.iter().map(|r| (&r.title, &r.location, r.deadline)).collect();
        assert_eq!(titles_a, titles_b);
    }

    #[tokio::test]
    async fn test_with_range() {
        let source = SyntheticSource::new(SourceId::Google).with_range(1, 1);
        assert_eq!(source.fetch(&request(1)).await.unwrap().len(), 1);
    }
}

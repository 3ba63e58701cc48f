//! Curated listings from government and cultural institutions.
//!
//! These sources publish on their own sites rather than through a search
//! API, so the adapter serves a fixed set of known programs with deadlines
//! relative to the request time. Records are flagged synthetic until
//! confirmed on the official site.

use async_trait::async_trait;
use chrono::Duration;

use crate::opportunity::{OpportunityType, RawOpportunity};

use super::{SourceAdapter, SourceError, SourceId, SourceRequest};

struct Listing {
    title: &'static str,
    issuer: &'static str,
    kind: OpportunityType,
    description: &'static str,
    location: &'static str,
    url: &'static str,
    deadline_days: i64,
    published_days_ago: i64,
    citation: &'static str,
}

const GOVERNMENT: &[Listing] = &[
    Listing {
        title: "Prêmio Literário Nacional - Funarte",
        issuer: "Fundação Nacional de Artes (Funarte)",
        kind: OpportunityType::Award,
        description: "Prêmio nacional de literatura da Funarte. Aceita inscrições de todo o Brasil.",
        location: "Nacional (todos os estados)",
        url: "https://www.funarte.gov.br/premio-literario",
        deadline_days: 60,
        published_days_ago: 3,
        citation: "Fonte oficial: Funarte - dados requerem verificação direta no site",
    },
    Listing {
        title: "Concurso Nacional de Literatura - Ministério da Cultura",
        issuer: "Ministério da Cultura",
        kind: OpportunityType::ContestLiterary,
        description: "Concurso nacional de literatura aberto para residentes de todos os estados brasileiros.",
        location: "Nacional (todos os estados)",
        url: "https://www.cultura.gov.br/concurso-literatura",
        deadline_days: 45,
        published_days_ago: 10,
        citation: "Fonte oficial: Ministério da Cultura - requer verificação manual",
    },
    Listing {
        title: "Edital Cultural Tocantins - Secretaria de Cultura",
        issuer: "Secretaria de Cultura do Tocantins",
        kind: OpportunityType::CulturalCall,
        description: "Edital para apoio a projetos culturais no estado do Tocantins. Prioridade para autores locais.",
        location: "Palmas, TO",
        url: "https://secult.to.gov.br/edital-cultural",
        deadline_days: 30,
        published_days_ago: 5,
        citation: "Fonte oficial: Secretaria de Cultura do Tocantins - requer verificação manual",
    },
];

const CULTURAL_ORGANIZATIONS: &[Listing] = &[
    Listing {
        title: "Programa Rumos Itaú Cultural - Literatura",
        issuer: "Itaú Cultural",
        kind: OpportunityType::CulturalCall,
        description: "Programa de apoio à produção literária contemporânea. Aberto para todo o Brasil.",
        location: "Nacional (todos os estados)",
        url: "https://www.itaucultural.org.br/programa-rumos-literatura",
        deadline_days: 90,
        published_days_ago: 7,
        citation: "Fonte: Itaú Cultural - informações requerem confirmação oficial",
    },
    Listing {
        title: "Chamada Pública para Antologia de Novos Autores - SESC",
        issuer: "SESC Nacional",
        kind: OpportunityType::PublicCall,
        description: "Chamada para composição de antologia de contos de autores estreantes.",
        location: "Nacional (todos os estados)",
        url: "https://www.sesc.com.br/chamada-antologia",
        deadline_days: 75,
        published_days_ago: 12,
        citation: "Fonte: SESC - informações requerem confirmação oficial",
    },
];

/// Adapter serving fixed institutional listings.
#[derive(Debug, Clone)]
pub struct CuratedSource {
    id: SourceId,
}

impl CuratedSource {
    /// Curated adapter for `id`. Sources without curated listings return
    /// no results.
    pub fn new(id: SourceId) -> Self {
        Self { id }
    }

    fn listings(&self) -> &'static [Listing] {
        match self.id {
            SourceId::Government => GOVERNMENT,
            SourceId::CulturalOrganizations => CULTURAL_ORGANIZATIONS,
            _ => &[],
        }
    }
}

#[async_trait]
impl SourceAdapter for CuratedSource {
    fn id(&self) -> SourceId {
        self.id
    }

    async fn fetch(&self, request: &SourceRequest) -> Result<Vec<RawOpportunity>, SourceError> {
        Ok(self
            .listings()
            .iter()
            .map(|l| RawOpportunity {
                search_engine: self.id.label().to_string(),
                title: l.title.to_string(),
                source: l.issuer.to_string(),
                kind: l.kind,
                description: l.description.to_string(),
                location: l.location.to_string(),
                deadline: Some(request.now + Duration::days(l.deadline_days)),
                published_date: Some(request.now - Duration::days(l.published_days_ago)),
                url: Some(l.url.to_string()),
                declared_eligible: None,
                is_synthetic: true,
                citation: Some(l.citation.to_string()),
            })
            .collect())
    }
}

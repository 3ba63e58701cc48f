//! Testing utilities and mock implementations.
//!
//! Provides a mock [`SourceAdapter`](crate::source::SourceAdapter) and
//! record builders, so pipeline and API tests run without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use litscout_core::testing::{fixtures, MockSource};
//!
//! let source = MockSource::new(SourceId::Google)
//!     .with_results(vec![fixtures::raw("Concurso de Contos", "Palmas, TO")]);
//! source.set_next_error(SourceError::Timeout).await;
//! ```

mod mock_source;

pub use mock_source::{MockSource, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::eligibility;
    use crate::opportunity::{OpportunityRecord, OpportunityType, RawOpportunity};

    /// Create a raw listing with reasonable defaults.
    pub fn raw(title: &str, location: &str) -> RawOpportunity {
        RawOpportunity {
            search_engine: String::new(),
            title: title.to_string(),
            source: "Fundação de Teste".to_string(),
            kind: OpportunityType::Other,
            description: format!("Descrição de {}", title),
            location: location.to_string(),
            deadline: None,
            published_date: None,
            url: Some(format!(
                "https://example.org/{}",
                title.to_lowercase().replace(' ', "-")
            )),
            declared_eligible: None,
            is_synthetic: false,
            citation: Some("Fonte de teste".to_string()),
        }
    }

    /// Raw listing with a deadline.
    pub fn raw_with_deadline(title: &str, location: &str, deadline: DateTime<Utc>) -> RawOpportunity {
        RawOpportunity {
            deadline: Some(deadline),
            ..raw(title, location)
        }
    }

    /// Classified record, as the aggregator would produce it.
    pub fn record(title: &str, location: &str) -> OpportunityRecord {
        raw(title, location).into_record("Mock", eligibility::classify(location))
    }
}

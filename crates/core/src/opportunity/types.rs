//! Types for opportunity records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::eligibility::{Classification, RegionCategory};

/// Shown in place of a missing URL.
pub const URL_UNAVAILABLE: &str = "unavailable";

/// Kind of literary opportunity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    ContestLiterary,
    CulturalCall,
    Anthology,
    Festival,
    Award,
    PublicCall,
    Other,
}

impl OpportunityType {
    /// Every type, in declaration order.
    pub const ALL: [OpportunityType; 7] = [
        OpportunityType::ContestLiterary,
        OpportunityType::CulturalCall,
        OpportunityType::Anthology,
        OpportunityType::Festival,
        OpportunityType::Award,
        OpportunityType::PublicCall,
        OpportunityType::Other,
    ];

    /// Canonical display label. Sorting by type compares these.
    pub fn label(&self) -> &'static str {
        match self {
            OpportunityType::ContestLiterary => "Concursos Literários",
            OpportunityType::CulturalCall => "Editais Culturais",
            OpportunityType::Anthology => "Antologias",
            OpportunityType::Festival => "Festivais",
            OpportunityType::Award => "Prêmios",
            OpportunityType::PublicCall => "Chamadas Públicas",
            OpportunityType::Other => "Outros",
        }
    }

    /// Map a provider category to a type.
    ///
    /// Accepts the display label, the snake_case id, or the variant name,
    /// case-insensitively. Anything else is `Other`.
    pub fn from_label(label: &str) -> Self {
        let needle = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| {
                t.label().to_lowercase() == needle
                    || t.id() == needle
                    || format!("{:?}", t).to_lowercase() == needle
            })
            .unwrap_or(OpportunityType::Other)
    }

    fn id(&self) -> &'static str {
        match self {
            OpportunityType::ContestLiterary => "contest_literary",
            OpportunityType::CulturalCall => "cultural_call",
            OpportunityType::Anthology => "anthology",
            OpportunityType::Festival => "festival",
            OpportunityType::Award => "award",
            OpportunityType::PublicCall => "public_call",
            OpportunityType::Other => "other",
        }
    }
}

/// Normalized listing as produced by a source adapter, before eligibility
/// classification.
#[derive(Debug, Clone)]
pub struct RawOpportunity {
    /// Label of the adapter that produced the listing.
    pub search_engine: String,
    pub title: String,
    /// Issuer of the opportunity (ministry, foundation, publisher...).
    pub source: String,
    pub kind: OpportunityType,
    pub description: String,
    pub location: String,
    pub deadline: Option<DateTime<Utc>>,
    pub published_date: Option<DateTime<Utc>>,
    pub url: Option<String>,
    /// Eligibility asserted by the provider, used only when the location
    /// itself is not conclusive.
    pub declared_eligible: Option<bool>,
    pub is_synthetic: bool,
    pub citation: Option<String>,
}

impl RawOpportunity {
    /// Attach the classifier's verdict. `search_engine` is the label the
    /// aggregator asked for and always wins over what the adapter stamped.
    pub fn into_record(self, search_engine: &str, classification: Classification) -> OpportunityRecord {
        if self.search_engine != search_engine {
            debug!(
                stamped = %self.search_engine,
                expected = %search_engine,
                "Adapter stamped a foreign label, overwriting"
            );
        }

        let eligible = match classification.category {
            RegionCategory::OtherRegion => self.declared_eligible.unwrap_or(false),
            _ => classification.eligible,
        };

        let title = if self.title.trim().is_empty() {
            "(sem título)".to_string()
        } else {
            self.title
        };

        OpportunityRecord {
            title,
            source: self.source,
            search_engine: search_engine.to_string(),
            kind: self.kind,
            description: self.description,
            location: self.location,
            region: classification.category,
            deadline: self.deadline,
            published_date: self.published_date,
            eligible,
            url: self.url.filter(|u| !u.trim().is_empty()),
            is_synthetic: self.is_synthetic,
            citation: self.citation,
        }
    }
}

/// Canonical search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityRecord {
    pub title: String,
    pub source: String,
    /// Adapter that produced the record.
    pub search_engine: String,
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Location category assigned by the classifier.
    pub region: RegionCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Demonstration or placeholder data, never to be shown as verified.
    pub is_synthetic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

impl OpportunityRecord {
    /// URL for display, or `"unavailable"`.
    pub fn url_or_unavailable(&self) -> &str {
        self.url.as_deref().unwrap_or(URL_UNAVAILABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eligibility::RegionProfile;

    fn raw(location: &str, declared: Option<bool>) -> RawOpportunity {
        RawOpportunity {
            search_engine: "Google".to_string(),
            title: "Prêmio".to_string(),
            source: "Funarte".to_string(),
            kind: OpportunityType::Award,
            description: String::new(),
            location: location.to_string(),
            deadline: None,
            published_date: None,
            url: None,
            declared_eligible: declared,
            is_synthetic: true,
            citation: None,
        }
    }

    #[test]
    fn test_type_from_label() {
        assert_eq!(
            OpportunityType::from_label("Concursos Literários"),
            OpportunityType::ContestLiterary
        );
        assert_eq!(OpportunityType::from_label("prêmios"), OpportunityType::Award);
        assert_eq!(OpportunityType::from_label("festival"), OpportunityType::Festival);
        assert_eq!(OpportunityType::from_label("PublicCall"), OpportunityType::PublicCall);
        assert_eq!(OpportunityType::from_label("Workshops"), OpportunityType::Other);
        assert_eq!(OpportunityType::from_label(""), OpportunityType::Other);
    }

    #[test]
    fn test_type_serialization() {
        assert_eq!(
            serde_json::to_string(&OpportunityType::ContestLiterary).unwrap(),
            "\"contest_literary\""
        );
    }

    #[test]
    fn test_declared_eligibility_only_for_other_region() {
        let profile = RegionProfile::default();

        let other = raw("São Paulo, SP", Some(true));
        let record = other.into_record("Google", profile.classify("São Paulo, SP"));
        assert!(record.eligible);
        assert_eq!(record.region, RegionCategory::OtherRegion);

        let undeclared = raw("São Paulo, SP", None);
        let record = undeclared.into_record("Google", profile.classify("São Paulo, SP"));
        assert!(!record.eligible);

        // The location wins over a contradicting declaration.
        let target = raw("Palmas, TO", Some(false));
        let record = target.into_record("Google", profile.classify("Palmas, TO"));
        assert!(record.eligible);
        assert_eq!(record.region, RegionCategory::TargetRegion);
    }

    #[test]
    fn test_missing_url_is_unavailable() {
        let mut item = raw("Palmas, TO", None);
        item.url = Some("   ".to_string());
        let record = item.into_record("Bing", RegionProfile::default().classify("Palmas, TO"));
        assert!(record.url.is_none());
        assert_eq!(record.url_or_unavailable(), "unavailable");
        assert_eq!(record.search_engine, "Bing");
    }

    #[test]
    fn test_record_serializes_type_field() {
        let record = raw("Palmas, TO", None)
            .into_record("Google", RegionProfile::default().classify("Palmas, TO"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "award");
        assert_eq!(json["region"], "target_region");
        assert!(json.get("deadline").is_none());
    }
}

//! Regional eligibility classification.
//!
//! Maps a free-text location to an eligibility verdict for the configured
//! target region. Matching is case-insensitive and works on whole words, so
//! "Internacional" is not mistaken for "Nacional". The region code is the
//! one exception: it only matches as an upper-case word ("Palmas, TO"),
//! since lower-case "to" is an ordinary word in running text.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Phrases that mark an opportunity as open to the whole country.
const NATIONWIDE_INDICATORS: &[&str] = &["nacional", "national", "todos os estados", "all states"];

/// Location category assigned by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RegionCategory {
    NationWide,
    TargetRegion,
    OtherRegion,
}

/// Result of classifying a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// `false` for `OtherRegion`; callers may substitute a source-declared
    /// value in that case.
    pub eligible: bool,
    pub category: RegionCategory,
}

/// Target region description.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegionProfile {
    /// State code, e.g. "TO".
    #[serde(default = "default_code")]
    pub code: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_municipalities")]
    pub municipalities: Vec<String>,
    /// Macro-region containing the target region; counts as nation-wide.
    #[serde(default = "default_macro_region")]
    pub macro_region: String,
}

impl Default for RegionProfile {
    fn default() -> Self {
        Self {
            code: default_code(),
            name: default_name(),
            municipalities: default_municipalities(),
            macro_region: default_macro_region(),
        }
    }
}

fn default_code() -> String {
    "TO".to_string()
}

fn default_name() -> String {
    "Tocantins".to_string()
}

fn default_municipalities() -> Vec<String> {
    ["Palmas", "Araguaína", "Gurupi", "Porto Nacional"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_macro_region() -> String {
    "Região Norte".to_string()
}

impl RegionProfile {
    /// Classify a location. Pure and total.
    pub fn classify(&self, location: &str) -> Classification {
        if self.mentions_target(location) {
            return Classification {
                eligible: true,
                category: RegionCategory::TargetRegion,
            };
        }

        let words = normalize(location);
        let nationwide = NATIONWIDE_INDICATORS
            .iter()
            .any(|indicator| contains_phrase(&words, indicator))
            || contains_phrase(&words, &self.macro_region);

        if nationwide {
            Classification {
                eligible: true,
                category: RegionCategory::NationWide,
            }
        } else {
            Classification {
                eligible: false,
                category: RegionCategory::OtherRegion,
            }
        }
    }

    /// Whether the text names the region, its code, or one of its
    /// municipalities.
    pub fn mentions_target(&self, text: &str) -> bool {
        let code = self.code.trim().to_uppercase();
        if !code.is_empty()
            && text
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == code)
        {
            return true;
        }

        let words = normalize(text);
        std::iter::once(&self.name)
            .chain(self.municipalities.iter())
            .any(|phrase| contains_phrase(&words, phrase))
    }
}

static DEFAULT_PROFILE: Lazy<RegionProfile> = Lazy::new(RegionProfile::default);

/// Classify against the default target region (Tocantins).
pub fn classify(location: &str) -> Classification {
    DEFAULT_PROFILE.classify(location)
}

/// Lower-case words separated by single spaces, padded on both sides.
fn normalize(text: &str) -> String {
    let joined = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    format!(" {} ", joined)
}

fn contains_phrase(normalized_text: &str, phrase: &str) -> bool {
    let needle = normalize(phrase);
    !needle.trim().is_empty() && normalized_text.contains(&needle)
}

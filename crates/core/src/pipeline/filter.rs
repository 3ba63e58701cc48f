//! Filter chain.
//!
//! Each stage is a pure narrowing predicate. Stages run in a fixed order:
//! regional inclusion, exclusion of other regions, national-only, type
//! allow-list, deadline horizon.

use chrono::{DateTime, Utc};

use crate::eligibility::RegionCategory;
use crate::opportunity::{OpportunityRecord, OpportunityType};

use super::{DeadlineHorizon, FilterConfig};

/// Keep only eligible records.
pub fn eligible_only(records: Vec<OpportunityRecord>) -> Vec<OpportunityRecord> {
    records.into_iter().filter(|r| r.eligible).collect()
}

/// Keep target-region and nation-wide records.
pub fn exclude_other_regions(records: Vec<OpportunityRecord>) -> Vec<OpportunityRecord> {
    records
        .into_iter()
        .filter(|r| r.region != RegionCategory::OtherRegion)
        .collect()
}

/// Keep nation-wide records.
pub fn national_only(records: Vec<OpportunityRecord>) -> Vec<OpportunityRecord> {
    records
        .into_iter()
        .filter(|r| r.region == RegionCategory::NationWide)
        .collect()
}

/// Keep records whose type is allowed. An empty allow-list keeps all.
pub fn by_type(records: Vec<OpportunityRecord>, allowed: &[OpportunityType]) -> Vec<OpportunityRecord> {
    if allowed.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| allowed.contains(&r.kind))
        .collect()
}

/// Keep records whose deadline falls at or before `now + horizon`.
///
/// Records without a deadline only survive [`DeadlineHorizon::None`].
pub fn by_deadline(
    records: Vec<OpportunityRecord>,
    horizon: DeadlineHorizon,
    now: DateTime<Utc>,
) -> Vec<OpportunityRecord> {
    let Some(window) = horizon.window() else {
        return records;
    };
    let cutoff = now + window;
    records
        .into_iter()
        .filter(|r| r.deadline.is_some_and(|d| d <= cutoff))
        .collect()
}

/// Run the whole chain.
pub fn apply_filters(
    records: Vec<OpportunityRecord>,
    config: &FilterConfig,
    now: DateTime<Utc>,
) -> Vec<OpportunityRecord> {
    let mut records = records;

    if config.include_target_region && !config.national_only {
        records = eligible_only(records);
    }
    if config.exclude_other_regions {
        records = exclude_other_regions(records);
    }
    if config.national_only {
        records = national_only(records);
    }
    records = by_type(records, &config.types);
    by_deadline(records, config.deadline, now)
}

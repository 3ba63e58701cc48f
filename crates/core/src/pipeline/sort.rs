//! Stable ordering of filtered records.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::opportunity::OpportunityRecord;

use super::{SortDirection, SortKey, SortSpec};

fn published_key(record: &OpportunityRecord) -> DateTime<Utc> {
    record.published_date.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn deadline_key(record: &OpportunityRecord) -> DateTime<Utc> {
    record.deadline.unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn compare(key: SortKey, a: &OpportunityRecord, b: &OpportunityRecord) -> Ordering {
    match key {
        SortKey::Relevance => Ordering::Equal,
        SortKey::PublishedDate => published_key(a).cmp(&published_key(b)),
        SortKey::Deadline => deadline_key(a).cmp(&deadline_key(b)),
        SortKey::Type => a.kind.label().cmp(b.kind.label()),
    }
}

/// Sort in place. `Relevance` keeps aggregation order; ties keep input
/// order in both directions.
///
/// A missing published date counts as the earliest instant and a missing
/// deadline as the latest one.
pub fn sort_records(records: &mut [OpportunityRecord], spec: SortSpec) {
    if spec.key == SortKey::Relevance {
        return;
    }
    match spec.direction {
        SortDirection::Ascending => records.sort_by(|a, b| compare(spec.key, a, b)),
        SortDirection::Descending => records.sort_by(|a, b| compare(spec.key, b, a)),
    }
}

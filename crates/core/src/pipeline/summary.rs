//! Aggregate counts over a record sequence.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::opportunity::{OpportunityRecord, OpportunityType};

/// Eligibility and type counts for display.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub eligible: usize,
    pub not_eligible: usize,
    /// 0 when `total` is 0.
    pub percentage_eligible: f64,
    pub by_type: BTreeMap<OpportunityType, usize>,
    /// Records that are demonstration or placeholder data.
    pub synthetic: usize,
}

pub fn summarize(records: &[OpportunityRecord]) -> Summary {
    let total = records.len();
    let eligible = records.iter().filter(|r| r.eligible).count();
    let mut by_type = BTreeMap::new();
    for record in records {
        *by_type.entry(record.kind).or_insert(0) += 1;
    }

    Summary {
        total,
        eligible,
        not_eligible: total - eligible,
        percentage_eligible: if total > 0 {
            eligible as f64 / total as f64 * 100.0
        } else {
            0.0
        },
        by_type,
        synthetic: records.iter().filter(|r| r.is_synthetic).count(),
    }
}

/// Records grouped by type, groups in label order, records in input order.
pub fn group_by_type(records: &[OpportunityRecord]) -> Vec<(OpportunityType, Vec<&OpportunityRecord>)> {
    let mut groups: BTreeMap<&'static str, (OpportunityType, Vec<&OpportunityRecord>)> =
        BTreeMap::new();
    for record in records {
        groups
            .entry(record.kind.label())
            .or_insert_with(|| (record.kind, Vec::new()))
            .1
            .push(record);
    }
    groups.into_values().collect()
}

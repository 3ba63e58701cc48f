//! Canonical opportunity records.
//!
//! Every source adapter normalizes its provider's native shape into a
//! [`RawOpportunity`]; the aggregator classifies it into an
//! [`OpportunityRecord`] that the filter chain, sorter and summary work on.

mod types;

pub use types::*;

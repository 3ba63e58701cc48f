//! Opportunity source adapters.
//!
//! This module provides the `SourceAdapter` trait implemented once per
//! external source, in three flavors:
//! - synthetic: randomized demonstration data,
//! - curated: fixed listings from known cultural institutions,
//! - live: an external lookup normalized into canonical records, degrading
//!   to a labeled placeholder when the provider yields nothing usable.
//!
//! Adapters are wired per source into a [`SourceRegistry`].

mod curated;
pub mod live;
mod registry;
mod synthetic;
mod types;

pub use curated::CuratedSource;
pub use registry::SourceRegistry;
pub use synthetic::SyntheticSource;
pub use types::*;

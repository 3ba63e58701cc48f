//! HTTP surface for the opportunity search pipeline.

pub mod api;
pub mod metrics;
pub mod state;

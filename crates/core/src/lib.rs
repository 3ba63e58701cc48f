pub mod config;
pub mod credentials;
pub mod eligibility;
pub mod metrics;
pub mod opportunity;
pub mod pipeline;
pub mod source;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    SanitizedConfig, ServerConfig, SourceMode, SourcesConfig,
};
pub use credentials::{
    source_statuses, ConfigCredentials, CredentialProvider, SourceStatus, StaticCredentials,
};
pub use eligibility::{classify, Classification, RegionCategory, RegionProfile};
pub use opportunity::{OpportunityRecord, OpportunityType, RawOpportunity};
pub use pipeline::{
    DeadlineHorizon, FilterConfig, PipelineError, SearchOutcome, SearchPipeline, SearchRequest,
    SortDirection, SortKey, SortSpec, Summary,
};
pub use source::{SourceAdapter, SourceError, SourceId, SourceRegistry, SourceRequest};
pub use store::{
    HistoryEntry, NewHistoryEntry, OpportunityStore, SavedOpportunity, SqliteStore, StoreError,
    StoreStats, UserPreferences,
};

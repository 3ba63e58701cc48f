use std::sync::Arc;

use litscout_core::{
    source_statuses, Config, CredentialProvider, OpportunityStore, SanitizedConfig,
    SearchPipeline, SourceRegistry, SourceStatus,
};

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: SearchPipeline,
    credentials: Arc<dyn CredentialProvider>,
    store: Option<Arc<dyn OpportunityStore>>,
}

impl AppState {
    /// Wire the pipeline over `registry`, recording history in `store` when present.
    pub fn new(
        config: Config,
        registry: Arc<SourceRegistry>,
        credentials: Arc<dyn CredentialProvider>,
        store: Option<Arc<dyn OpportunityStore>>,
    ) -> Self {
        let mut pipeline = SearchPipeline::new(registry, config.region.clone());
        if let Some(store) = &store {
            pipeline = pipeline.with_store(Arc::clone(store));
        }
        Self {
            config,
            pipeline,
            credentials,
            store,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn pipeline(&self) -> &SearchPipeline {
        &self.pipeline
    }

    pub fn store(&self) -> Option<&Arc<dyn OpportunityStore>> {
        self.store.as_ref()
    }

    pub fn source_statuses(&self) -> Vec<SourceStatus> {
        source_statuses(self.pipeline.registry(), self.credentials.as_ref())
    }
}

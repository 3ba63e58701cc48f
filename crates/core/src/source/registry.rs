//! Source registry: one adapter per known source.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{SourceMode, SourcesConfig};
use crate::credentials::CredentialProvider;
use crate::eligibility::RegionProfile;

use super::live::{
    build_client, BraveProvider, DuckDuckGoProvider, GoogleProvider, LiveSource, YahooProvider,
};
use super::{CuratedSource, SourceAdapter, SourceError, SourceId, SyntheticSource};

/// Maps each source to the adapter wired for it.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    adapters: HashMap<SourceId, Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire adapters according to the configured mode.
    ///
    /// Government and cultural-organization sources always use their
    /// curated listings. In live mode the search engines with a live
    /// provider get one; the rest stay synthetic.
    pub fn from_config(
        config: &SourcesConfig,
        region: &RegionProfile,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, SourceError> {
        let mut registry = Self::new();
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = match config.mode {
            SourceMode::Live => Some(build_client(timeout)?),
            SourceMode::Synthetic => None,
        };

        for id in SourceId::ALL {
            let adapter: Arc<dyn SourceAdapter> = match (id, &client) {
                (SourceId::Government | SourceId::CulturalOrganizations, _) => {
                    Arc::new(CuratedSource::new(id))
                }
                (SourceId::Google, Some(client)) => Arc::new(LiveSource::new(
                    GoogleProvider::new(
                        client.clone(),
                        config.max_results,
                        Duration::from_millis(config.request_delay_ms),
                    ),
                    credentials.clone(),
                    region.clone(),
                    timeout,
                )),
                (SourceId::Bravo, Some(client)) => Arc::new(LiveSource::new(
                    BraveProvider::new(client.clone(), config.max_results),
                    credentials.clone(),
                    region.clone(),
                    timeout,
                )),
                (SourceId::DuckDuckGo, Some(client)) => Arc::new(LiveSource::new(
                    DuckDuckGoProvider::new(client.clone(), config.max_results),
                    credentials.clone(),
                    region.clone(),
                    timeout,
                )),
                (SourceId::Yahoo, Some(client)) => Arc::new(LiveSource::new(
                    YahooProvider::new(client.clone(), config.max_results),
                    credentials.clone(),
                    region.clone(),
                    timeout,
                )),
                _ => Arc::new(SyntheticSource::new(id)),
            };
            registry.register(adapter);
        }

        info!(
            mode = ?config.mode,
            live = registry.adapters.values().filter(|a| a.is_live()).count(),
            "Source registry initialized"
        );

        Ok(registry)
    }

    /// Add or replace the adapter for its source.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        self.adapters.insert(adapter.id(), adapter);
    }

    pub fn get(&self, id: SourceId) -> Option<&Arc<dyn SourceAdapter>> {
        self.adapters.get(&id)
    }

    /// Registered sources in table order.
    pub fn ids(&self) -> Vec<SourceId> {
        SourceId::ALL
            .into_iter()
            .filter(|id| self.adapters.contains_key(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.ids())
            .finish()
    }
}

//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{AdminApiClient, BackendError};
use crate::config::AdminConfig;
use crate::drafts::DraftStore;

/// Application state shared across all handlers.
///
/// Cheap to clone; holds the backend client and the open product drafts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: AdminApiClient,
    drafts: DraftStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, BackendError> {
        let api = AdminApiClient::new(&config.api_url)?;
        let drafts = DraftStore::new(config.draft_ttl);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                drafts,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Catalog backend client.
    #[must_use]
    pub fn api(&self) -> &AdminApiClient {
        &self.inner.api
    }

    /// Open product forms.
    #[must_use]
    pub fn drafts(&self) -> &DraftStore {
        &self.inner.drafts
    }
}

//! Core StoreHooks functionality
//!
//! [`StoreHooks`] owns the remote store, the cache manager and the signal
//! manager, and hands out per-resource hooks that share them.

use std::sync::Arc;

use cache_system::CacheManager;
use config::AppConfig;
use remote_store::{RemoteStore, RestClient};
use signal_system::SignalManager;

use crate::errors::StoreHooksError;
use crate::hooks::ResourceHooks;
use crate::resource::{Comments, Posts, Resource, Users};

/// Shared context behind every resource's hooks
#[derive(Clone, Debug)]
pub struct StoreHooks {
    store: Arc<dyn RemoteStore>,
    cache: Arc<CacheManager>,
    signals: Arc<SignalManager>,
}

impl StoreHooks {
    /// Connect to the hosted service described by `config`
    pub fn new(config: AppConfig) -> Result<Self, StoreHooksError> {
        config.validate()?;

        let client = RestClient::new(&config.remote)?;
        crate::debug_log!(rest_url = client.rest_url(), "remote store client ready");

        let cache = CacheManager::new(config.cache)?;
        Ok(Self::from_parts(Arc::new(client), Arc::new(cache)))
    }

    /// Build from the environment, failing before any request when the
    /// project URL or API key is missing
    pub fn from_env() -> Result<Self, StoreHooksError> {
        Self::new(AppConfig::load()?)
    }

    /// Compose from an existing store and cache, e.g. [`remote_store::MemoryStore`]
    pub fn from_parts(store: Arc<dyn RemoteStore>, cache: Arc<CacheManager>) -> Self {
        Self {
            store,
            cache,
            signals: Arc::new(SignalManager::new()),
        }
    }

    /// Hooks for any resource; mutations emit on [`Self::signals`]
    pub fn hooks<R: Resource>(&self) -> Result<ResourceHooks<R>, StoreHooksError> {
        let hooks = ResourceHooks::<R>::for_store(self.store.clone(), self.cache.clone())?;
        Ok(hooks.with_signals(self.signals.clone()))
    }

    pub fn users(&self) -> Result<ResourceHooks<Users>, StoreHooksError> {
        self.hooks::<Users>()
    }

    pub fn posts(&self) -> Result<ResourceHooks<Posts>, StoreHooksError> {
        self.hooks::<Posts>()
    }

    pub fn comments(&self) -> Result<ResourceHooks<Comments>, StoreHooksError> {
        self.hooks::<Comments>()
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    /// Check the cache backend is reachable; the remote store is checked by
    /// any read
    pub async fn health_check(&self) -> Result<(), StoreHooksError> {
        self.cache.health_check().await?;
        Ok(())
    }

    /// Register mutation observers here
    pub fn signals(&self) -> &Arc<SignalManager> {
        &self.signals
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::catalog::{CACHE_FILE_NAME, CatalogCache, FetchOrigin, FetchedCatalog, StorySource};
use crate::config::Config;

pub const ONBOARDING_FLAG_FILE: &str = "onboarding_done";

/// The "has completed onboarding" flag. Read once when the store is created,
/// written at most once.
#[derive(Debug, Clone)]
pub struct OnboardingStore {
    path: Option<PathBuf>,
    completed: bool,
}

impl OnboardingStore {
    pub fn load(path: Option<PathBuf>) -> Self {
        let completed = path.as_deref().is_some_and(Path::exists);
        Self { path, completed }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Marks onboarding done. Returns false if it already was.
    pub fn complete(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        if let Some(path) = &self.path {
            let written = path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|()| fs::write(path, b"1"));
            if let Err(err) = written {
                warn!(path = %path.display(), %err, "failed to persist onboarding flag");
            }
        }
        true
    }
}

/// Shared handle to the catalog cache; cheap to clone into fetch tasks.
#[derive(Clone)]
pub struct CatalogHandle {
    inner: Arc<Mutex<CatalogCache>>,
}

impl CatalogHandle {
    pub fn new(cache: CatalogCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn source_name(&self) -> String {
        match self.inner.lock() {
            Ok(cache) => cache.source_name(),
            Err(poisoned) => poisoned.into_inner().source_name(),
        }
    }

    /// Runs the fetch on the blocking pool. Never fails: problems surface as
    /// an empty catalog.
    pub async fn fetch_stories(&self, force_refresh: bool) -> FetchedCatalog {
        let inner = Arc::clone(&self.inner);
        let joined = tokio::task::spawn_blocking(move || match inner.lock() {
            Ok(mut cache) => cache.fetch_stories(force_refresh),
            Err(poisoned) => poisoned.into_inner().fetch_stories(force_refresh),
        })
        .await;
        match joined {
            Ok(fetched) => {
                debug!(
                    count = fetched.stories.len(),
                    origin = ?fetched.origin,
                    "catalog fetch task finished"
                );
                fetched
            }
            Err(err) => {
                warn!(%err, "catalog fetch task failed");
                FetchedCatalog {
                    stories: Vec::new(),
                    origin: FetchOrigin::Failed,
                }
            }
        }
    }
}

/// Lifecycle-scoped collaborators shared by one viewer run: the catalog cache
/// and the onboarding flag.
pub struct ViewerSession {
    catalog: CatalogHandle,
    onboarding: OnboardingStore,
}

impl ViewerSession {
    pub fn new(source: Arc<dyn StorySource>, config: &Config, data_dir: Option<&Path>) -> Self {
        let persisted = data_dir
            .filter(|_| config.catalog.persist_cache)
            .map(|dir| dir.join(CACHE_FILE_NAME));
        let onboarding = OnboardingStore::load(data_dir.map(|dir| dir.join(ONBOARDING_FLAG_FILE)));
        Self {
            catalog: CatalogHandle::new(CatalogCache::new(
                source,
                persisted,
                config.catalog.cache_ttl(),
            )),
            onboarding,
        }
    }

    pub fn catalog(&self) -> CatalogHandle {
        self.catalog.clone()
    }

    pub fn onboarding(&self) -> &OnboardingStore {
        &self.onboarding
    }

    pub fn onboarding_mut(&mut self) -> &mut OnboardingStore {
        &mut self.onboarding
    }
}

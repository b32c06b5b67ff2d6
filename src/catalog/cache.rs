use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::model::Story;
use super::source::StorySource;

pub const CACHE_FILE_NAME: &str = "catalog_cache_v1.json";

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCatalog {
    stories: Vec<Story>,
    /// Milliseconds since the unix epoch.
    timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    Memory,
    Persisted,
    Source,
    Failed,
}

#[derive(Debug, Clone)]
pub struct FetchedCatalog {
    pub stories: Vec<Story>,
    pub origin: FetchOrigin,
}

/// Memory cache, then a time-boxed persisted cache, then the source.
pub struct CatalogCache {
    source: Arc<dyn StorySource>,
    persisted_path: Option<PathBuf>,
    ttl: Duration,
    memory: Option<Vec<Story>>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn StorySource>, persisted_path: Option<PathBuf>, ttl: Duration) -> Self {
        Self {
            source,
            persisted_path,
            ttl,
            memory: None,
        }
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Never fails: a broken source yields an empty catalog.
    pub fn fetch_stories(&mut self, force_refresh: bool) -> FetchedCatalog {
        self.fetch_stories_at(force_refresh, SystemTime::now())
    }

    pub(crate) fn fetch_stories_at(&mut self, force_refresh: bool, now: SystemTime) -> FetchedCatalog {
        if !force_refresh {
            if let Some(stories) = &self.memory {
                debug!(count = stories.len(), "catalog served from memory");
                return FetchedCatalog {
                    stories: stories.clone(),
                    origin: FetchOrigin::Memory,
                };
            }
            if let Some(stories) = self.read_persisted(now) {
                info!(count = stories.len(), "catalog served from persisted cache");
                self.memory = Some(stories.clone());
                return FetchedCatalog {
                    stories,
                    origin: FetchOrigin::Persisted,
                };
            }
        }

        match self.source.load() {
            Ok(stories) => {
                info!(
                    count = stories.len(),
                    source = %self.source.describe(),
                    force_refresh,
                    "catalog fetched"
                );
                self.memory = Some(stories.clone());
                self.write_persisted(&stories, now);
                FetchedCatalog {
                    stories,
                    origin: FetchOrigin::Source,
                }
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed");
                FetchedCatalog {
                    stories: Vec::new(),
                    origin: FetchOrigin::Failed,
                }
            }
        }
    }

    fn read_persisted(&self, now: SystemTime) -> Option<Vec<Story>> {
        let path = self.persisted_path.as_ref()?;
        let raw = fs::read_to_string(path).ok()?;
        let parsed = match serde_json::from_str::<PersistedCatalog>(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, path = %path.display(), "persisted catalog unreadable");
                return None;
            }
        };
        let age_ms = epoch_millis(now).saturating_sub(parsed.timestamp);
        if u128::from(age_ms) >= self.ttl.as_millis() {
            debug!(age_ms, "persisted catalog expired");
            return None;
        }
        Some(parsed.stories)
    }

    fn write_persisted(&self, stories: &[Story], now: SystemTime) {
        let Some(path) = self.persisted_path.as_ref() else {
            return;
        };
        let payload = PersistedCatalog {
            stories: stories.to_vec(),
            timestamp: epoch_millis(now),
        };
        let result = serde_json::to_string(&payload)
            .map_err(std::io::Error::other)
            .and_then(|raw| {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, raw)
            });
        if let Err(err) = result {
            debug!(error = %err, path = %path.display(), "persisted catalog write ignored");
        }
    }
}

fn epoch_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis().min(u128::from(u64::MAX)) as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, SystemTime};

    use super::{CatalogCache, FetchOrigin};
    use crate::catalog::model::Story;
    use crate::catalog::model::fixtures::catalog;
    use crate::catalog::source::StorySource;
    use crate::config::unique_temp_path;
    use crate::error::{AppError, AppResult};

    struct CountingSource {
        stories: Vec<Story>,
        loads: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(stories: Vec<Story>, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                stories,
                loads: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl StorySource for CountingSource {
        fn describe(&self) -> String {
            "counting".to_string()
        }

        fn load(&self) -> AppResult<Vec<Story>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::catalog("offline"));
            }
            Ok(self.stories.clone())
        }
    }

    #[test]
    fn memory_cache_short_circuits_until_forced() {
        let source = CountingSource::new(catalog(&[1, 2]), false);
        let mut cache = CatalogCache::new(source.clone(), None, Duration::from_secs(300));

        assert_eq!(cache.fetch_stories(false).origin, FetchOrigin::Source);
        assert_eq!(cache.fetch_stories(false).origin, FetchOrigin::Memory);
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);

        assert_eq!(cache.fetch_stories(true).origin, FetchOrigin::Source);
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn persisted_cache_respects_ttl() {
        let path = unique_temp_path("catalog_cache.json");
        let now = SystemTime::now();
        let ttl = Duration::from_secs(300);

        let source = CountingSource::new(catalog(&[3]), false);
        let mut writer = CatalogCache::new(source, Some(path.clone()), ttl);
        writer.fetch_stories_at(false, now);

        let offline = CountingSource::new(Vec::new(), true);
        let mut fresh = CatalogCache::new(offline.clone(), Some(path.clone()), ttl);
        let fetched = fresh.fetch_stories_at(false, now + Duration::from_secs(60));
        assert_eq!(fetched.origin, FetchOrigin::Persisted);
        assert_eq!(fetched.stories.len(), 1);
        assert_eq!(offline.loads.load(Ordering::SeqCst), 0);

        let mut stale = CatalogCache::new(offline.clone(), Some(path.clone()), ttl);
        let fetched = stale.fetch_stories_at(false, now + Duration::from_secs(301));
        assert_eq!(fetched.origin, FetchOrigin::Failed);
        assert!(fetched.stories.is_empty());

        fs::remove_file(&path).expect("cache file should be removed");
    }

    #[test]
    fn failed_fetch_degrades_to_empty_catalog() {
        let mut cache = CatalogCache::new(
            CountingSource::new(Vec::new(), true),
            None,
            Duration::from_secs(300),
        );
        let fetched = cache.fetch_stories(true);
        assert_eq!(fetched.origin, FetchOrigin::Failed);
        assert!(fetched.stories.is_empty());
    }
}

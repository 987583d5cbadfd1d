//! Build-once cache for catalog-derived data
//!
//! Readers take a shared lock and clone the `Arc`. The first reader after a
//! miss holds the async build guard while it queries the catalog, so
//! concurrent first access builds once. Failed builds are not stored.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

pub struct LazyCache<T> {
    value: RwLock<Option<Arc<T>>>,
    build_guard: Mutex<()>,
    /// Bumped by `invalidate`; a build that started before the bump is discarded
    generation: AtomicU64,
}

impl<T> LazyCache<T> {
    pub fn new() -> Self {
        Self {
            value: RwLock::new(None),
            build_guard: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Cached value, if built
    pub fn get(&self) -> Option<Arc<T>> {
        self.value.read().clone()
    }

    pub fn is_built(&self) -> bool {
        self.value.read().is_some()
    }

    /// Cached value, building it with `build` on a miss
    pub async fn get_or_try_build<F, Fut, E>(&self, build: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }

        let _guard = self.build_guard.lock().await;
        if let Some(value) = self.get() {
            return Ok(value);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let built = Arc::new(build().await?);

        if self.generation.load(Ordering::Acquire) == generation {
            *self.value.write() = Some(Arc::clone(&built));
        }
        Ok(built)
    }

    /// Drop the cached value; the next read rebuilds
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        *self.value.write() = None;
    }
}

impl<T> Default for LazyCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

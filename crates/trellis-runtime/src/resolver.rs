//! Asynchronous named-module resolution with a per-name cache.
//!
//! Discovery turns declared widget names into sealed definitions through
//! a [`ModuleSource`]. The [`ModuleResolver`] wrapper guarantees single
//! resolution: a name is fetched once and the resulting definition shared
//! by every element that requested it.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use trellis_core::alloc::HashMap;

use crate::definition::WidgetDefinition;
use crate::error::{WidgetError, WidgetResult};
use crate::registry::DefinitionRegistry;

/// A boxed resolution future.
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = WidgetResult<Arc<WidgetDefinition>>> + Send + 'a>>;

/// Source of widget definitions, keyed by name.
///
/// Failures surface as [`WidgetError::ModuleResolution`].
pub trait ModuleSource: Send + Sync {
    fn fetch(&self, name: &str) -> FetchFuture<'_>;
}

/// Caching wrapper around a [`ModuleSource`].
pub struct ModuleResolver {
    source: Arc<dyn ModuleSource>,
    cache: Mutex<HashMap<String, Arc<WidgetDefinition>>>,
}

impl ModuleResolver {
    pub fn new(source: impl ModuleSource + 'static) -> Self {
        Self::from_source(Arc::new(source))
    }

    pub fn from_source(source: Arc<dyn ModuleSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a name, fetching from the source only on a cache miss.
    /// Failed fetches are not cached; a later resolve retries.
    ///
    /// Concurrent resolves of the same name may both reach the source,
    /// but the first insert wins: every caller receives the same shared
    /// definition.
    pub async fn resolve(&self, name: &str) -> WidgetResult<Arc<WidgetDefinition>> {
        if let Some(hit) = self.cache.lock().expect("resolver cache poisoned").get(name) {
            return Ok(hit.clone());
        }
        let definition = self.source.fetch(name).await?;
        tracing::debug!(name, "module resolved");
        let mut cache = self.cache.lock().expect("resolver cache poisoned");
        Ok(cache.entry(name.to_string()).or_insert(definition).clone())
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache
            .lock()
            .expect("resolver cache poisoned")
            .contains_key(name)
    }
}

/// A [`ModuleSource`] over an already-populated registry.
///
/// Build and fill the registry at startup, then hand it to the source;
/// the registry is read-only from that point on.
pub struct RegistrySource {
    registry: Arc<DefinitionRegistry>,
}

impl RegistrySource {
    pub fn new(registry: Arc<DefinitionRegistry>) -> Self {
        Self { registry }
    }
}

impl ModuleSource for RegistrySource {
    fn fetch(&self, name: &str) -> FetchFuture<'_> {
        let result = self
            .registry
            .resolve(name)
            .map_err(|_| WidgetError::ModuleResolution {
                name: name.to_string(),
                message: "no registered definition".to_string(),
            });
        Box::pin(async move { result })
    }
}

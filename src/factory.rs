//! Localizer factory: one cached localizer per base name.
//!
//! The factory is created once at startup and shared as an `Arc`. Localizers
//! are created on first request and kept until [`SqlStringLocalizerFactory::clear_cache`].

use crate::config::LocalizationOptions;
use crate::data_source::sql::SqlDataSourceBuilder;
use crate::data_source::DataSourceBuilder;
use crate::error::{LocalizationError, Result};
use crate::localizer::SqlStringLocalizer;
use crate::metrics::LookupMetrics;
use crate::naming::{base_name_for_location, base_name_for_owner, location_cache_key, ResourceOwner};
use crate::registration::TypedLocalizer;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates and caches [`SqlStringLocalizer`]s.
pub struct SqlStringLocalizerFactory {
    options: LocalizationOptions,
    data_sources: Arc<dyn DataSourceBuilder>,
    cache: DashMap<String, Arc<SqlStringLocalizer>>,
    metrics: Arc<LookupMetrics>,
}

impl SqlStringLocalizerFactory {
    /// Create a factory backed by PostgreSQL.
    pub fn new(options: LocalizationOptions) -> Self {
        Self::with_data_source_builder(options, Arc::new(SqlDataSourceBuilder::new()))
    }

    /// Create a factory using `data_sources` to back each new localizer.
    pub fn with_data_source_builder(
        options: LocalizationOptions,
        data_sources: Arc<dyn DataSourceBuilder>,
    ) -> Self {
        Self {
            options,
            data_sources,
            cache: DashMap::new(),
            metrics: Arc::new(LookupMetrics::new()),
        }
    }

    /// Localizer for a registered resource owner type.
    pub fn create<T: ResourceOwner>(&self) -> Result<Arc<SqlStringLocalizer>> {
        self.create_for_owner(T::FULL_NAME, T::MODULE)
    }

    /// Localizer for an owner given by its qualified name and module.
    ///
    /// Cached under the derived base name.
    pub fn create_for_owner(&self, full_name: &str, module: &str) -> Result<Arc<SqlStringLocalizer>> {
        require_non_empty("full_name", full_name)?;
        require_non_empty("module", module)?;

        let base_name = base_name_for_owner(full_name, module, self.options.resources_path.as_deref());
        self.get_or_create(base_name.clone(), &base_name)
    }

    /// Localizer for an explicit base name relative to a location.
    ///
    /// Cached under `"B=<base_name>,L=<location>"`.
    pub fn create_from_location(&self, base_name: &str, location: &str) -> Result<Arc<SqlStringLocalizer>> {
        require_non_empty("base_name", base_name)?;
        require_non_empty("location", location)?;

        let resolved = base_name_for_location(base_name, location, self.options.resources_path.as_deref());
        self.get_or_create(location_cache_key(base_name, location), &resolved)
    }

    /// Per-type localizer wrapper for `T`.
    pub fn create_typed<T: ResourceOwner>(&self) -> Result<TypedLocalizer<T>> {
        Ok(TypedLocalizer::new(self.create::<T>()?))
    }

    /// Drop all cached localizers.
    ///
    /// Localizers already handed out keep working with their own caches.
    pub fn clear_cache(&self) {
        let count = self.cache.len();
        self.cache.clear();
        info!(count, "Cleared localizer cache");
    }

    /// Number of cached localizers.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn options(&self) -> &LocalizationOptions {
        &self.options
    }

    /// Lookup metrics shared by every localizer this factory created.
    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    fn get_or_create(&self, cache_key: String, base_name: &str) -> Result<Arc<SqlStringLocalizer>> {
        if let Some(existing) = self.cache.get(&cache_key) {
            return Ok(Arc::clone(existing.value()));
        }

        // The entry holds its shard locked, so racing callers wait for
        // this construction instead of building their own.
        match self.cache.entry(cache_key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let data_source =
                    self.data_sources
                        .build(base_name, &self.options, Arc::clone(&self.metrics))?;
                let localizer = Arc::new(SqlStringLocalizer::with_metrics(
                    base_name,
                    data_source,
                    Arc::clone(&self.metrics),
                ));
                debug!(base_name = %base_name, cache_key = %entry.key(), "Created localizer");
                Ok(Arc::clone(entry.insert(localizer).value()))
            }
        }
    }
}

impl fmt::Debug for SqlStringLocalizerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlStringLocalizerFactory")
            .field("options", &self.options)
            .field("data_sources", &self.data_sources)
            .field("cached", &self.cache.len())
            .finish()
    }
}

fn require_non_empty(argument: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(LocalizationError::invalid_argument(argument, "must not be empty"));
    }
    Ok(())
}

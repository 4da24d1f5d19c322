//! Data sources: where localized records come from.
//!
//! # Architecture
//!
//! - [`DataSource`]: the lookup capability a localizer consumes
//! - [`RecordLoader`]: fetches the raw records for one path filter
//! - `cached`: [`CachedDataSource`], loading once and matching in memory
//! - `sql`: PostgreSQL loader and the default [`DataSourceBuilder`]
//! - `memory`: in-process loader, used for fixtures and tests

mod cached;
pub mod memory;
pub mod sql;

pub use cached::CachedDataSource;

use crate::config::LocalizationOptions;
use crate::culture::Culture;
use crate::error::Result;
use crate::metrics::LookupMetrics;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A loaded translation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringRecord {
    /// Culture the value is written in; empty for the neutral fallback
    pub culture_name: String,
    pub key: String,
    pub value: String,
}

impl StringRecord {
    pub fn new(
        culture_name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            culture_name: culture_name.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// A record with no culture, used when no culture-specific entry exists.
    pub fn neutral(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new("", key, value)
    }
}

/// Lookup capability over the records of one base name.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Resolve `key` for `culture`, falling back to the neutral entry.
    ///
    /// `Ok(None)` means neither entry exists; errors are load failures.
    async fn get_string_for(&self, key: &str, culture: &Culture) -> Result<Option<String>>;

    /// Keys available for `culture`.
    ///
    /// With `include_parent_cultures`, keys of every culture sharing the
    /// requested culture's parent are included.
    async fn get_all_names_for(
        &self,
        include_parent_cultures: bool,
        culture: &Culture,
    ) -> Result<Vec<String>>;

    /// Resolve `key` for the ambient UI culture.
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        let culture = Culture::current();
        self.get_string_for(key, &culture).await
    }

    /// Keys available for the ambient UI culture.
    async fn get_all_names(&self, include_parent_cultures: bool) -> Result<Vec<String>> {
        let culture = Culture::current();
        self.get_all_names_for(include_parent_cultures, &culture).await
    }
}

/// Fetches every record whose path matches `filter`.
#[async_trait]
pub trait RecordLoader: Send + Sync + fmt::Debug {
    async fn load(&self, filter: &str) -> Result<Vec<StringRecord>>;
}

#[async_trait]
impl<L: RecordLoader + ?Sized> RecordLoader for Arc<L> {
    async fn load(&self, filter: &str) -> Result<Vec<StringRecord>> {
        (**self).load(filter).await
    }
}

/// Builds a fresh data source for each new localizer.
pub trait DataSourceBuilder: Send + Sync + fmt::Debug {
    /// Build a data source for `base_name`.
    ///
    /// # Errors
    /// Configuration errors: missing parameters or a base name the filter
    /// rule cannot narrow. No backing-store contact happens here.
    fn build(
        &self,
        base_name: &str,
        options: &LocalizationOptions,
        metrics: Arc<LookupMetrics>,
    ) -> Result<Arc<dyn DataSource>>;
}

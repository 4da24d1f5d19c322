//! Lazily-loaded, memoized data source.
//!
//! The first lookup loads every record for the base name's filter; later
//! lookups are answered from memory. Concurrent first callers share a single
//! load. A failed load leaves the source unloaded, so the next call retries.

use super::{DataSource, RecordLoader, StringRecord};
use crate::culture::{parent_name, Culture};
use crate::error::Result;
use crate::metrics::LookupMetrics;
use crate::naming::FilterRule;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Records of one base name, indexed by culture name and key.
struct RecordSet {
    records: Vec<StringRecord>,
    /// culture name → key → position of the first matching record
    index: HashMap<String, HashMap<String, usize>>,
}

impl RecordSet {
    fn new(records: Vec<StringRecord>) -> Self {
        let mut index: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            index
                .entry(record.culture_name.clone())
                .or_default()
                .entry(record.key.clone())
                .or_insert(position);
        }
        Self { records, index }
    }

    fn find(&self, culture_name: &str, key: &str) -> Option<&str> {
        let position = *self.index.get(culture_name)?.get(key)?;
        self.records.get(position).map(|record| record.value.as_str())
    }

    /// Exact culture first, then the neutral entry.
    fn resolve(&self, key: &str, culture: &Culture) -> Option<&str> {
        self.find(culture.name(), key).or_else(|| self.find("", key))
    }

    /// Keys for `culture`, in storage order.
    ///
    /// Parent matching compares the *parents* of the stored and requested
    /// cultures, so "fr-FR" includes "fr-CA" records but not "fr" records.
    fn names(&self, include_parent_cultures: bool, culture: &Culture) -> Vec<String> {
        let requested_parent = parent_name(culture.name());
        self.records
            .iter()
            .filter(|record| {
                if include_parent_cultures {
                    parent_name(&record.culture_name) == requested_parent
                } else {
                    record.culture_name == culture.name()
                }
            })
            .map(|record| record.key.clone())
            .collect()
    }
}

/// A [`DataSource`] that loads its records once through a [`RecordLoader`].
pub struct CachedDataSource<L> {
    loader: L,
    base_name: String,
    filter: String,
    records: OnceCell<RecordSet>,
    metrics: Option<Arc<LookupMetrics>>,
}

impl<L: RecordLoader> CachedDataSource<L> {
    /// Create an unloaded data source for `base_name`.
    ///
    /// # Errors
    /// Returns `LocalizationError::BaseNameTooShort` if `rule` cannot narrow
    /// the base name into a filter.
    pub fn new(base_name: &str, rule: &FilterRule, loader: L) -> Result<Self> {
        let filter = rule.derive_filter(base_name)?;
        Ok(Self {
            loader,
            base_name: base_name.to_string(),
            filter,
            records: OnceCell::new(),
            metrics: None,
        })
    }

    /// Report loads and load failures to `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<LookupMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Path filter the loader is queried with.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Whether the record set has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.records.initialized()
    }

    async fn records(&self) -> Result<&RecordSet> {
        self.records
            .get_or_try_init(|| async {
                debug!(base_name = %self.base_name, filter = %self.filter, "Loading localized strings");
                match self.loader.load(&self.filter).await {
                    Ok(records) => {
                        info!(
                            base_name = %self.base_name,
                            filter = %self.filter,
                            count = records.len(),
                            "Loaded localized strings"
                        );
                        if let Some(metrics) = &self.metrics {
                            metrics.record_load();
                        }
                        Ok(RecordSet::new(records))
                    }
                    Err(e) => {
                        if let Some(metrics) = &self.metrics {
                            metrics.record_load_failure();
                        }
                        Err(e)
                    }
                }
            })
            .await
    }
}

#[async_trait]
impl<L: RecordLoader> DataSource for CachedDataSource<L> {
    async fn get_string_for(&self, key: &str, culture: &Culture) -> Result<Option<String>> {
        let records = self.records().await?;
        Ok(records.resolve(key, culture).map(str::to_string))
    }

    async fn get_all_names_for(
        &self,
        include_parent_cultures: bool,
        culture: &Culture,
    ) -> Result<Vec<String>> {
        let records = self.records().await?;
        Ok(records.names(include_parent_cultures, culture))
    }
}

impl<L: fmt::Debug> fmt::Debug for CachedDataSource<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedDataSource")
            .field("base_name", &self.base_name)
            .field("filter", &self.filter)
            .field("loaded", &self.records.initialized())
            .field("loader", &self.loader)
            .finish()
    }
}

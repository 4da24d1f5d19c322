//! In-process record loader.
//!
//! Serves a fixed record set regardless of filter, counts fetches and can
//! simulate slow or failing loads. Useful as a fixture in development and as
//! the backing-store double in tests.

use super::{CachedDataSource, DataSource, DataSourceBuilder, RecordLoader, StringRecord};
use crate::config::LocalizationOptions;
use crate::error::{LocalizationError, Result};
use crate::metrics::LookupMetrics;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Loader returning a fixed set of records.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    records: Vec<StringRecord>,
    fetches: AtomicUsize,
    failures_remaining: AtomicUsize,
    delay: Option<Duration>,
    filters: Mutex<Vec<String>>,
}

impl MemoryLoader {
    pub fn new(records: Vec<StringRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    /// Fail the first `attempts` loads.
    pub fn failing_first(self, attempts: usize) -> Self {
        self.failures_remaining.store(attempts, Ordering::SeqCst);
        self
    }

    /// Sleep before answering each load.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of load calls made, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Filters received, in call order.
    pub fn filters(&self) -> Vec<String> {
        self.filters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl RecordLoader for MemoryLoader {
    async fn load(&self, filter: &str) -> Result<Vec<StringRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.filters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(filter.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok();
        if should_fail {
            return Err(LocalizationError::Load {
                filter: filter.to_string(),
                message: "simulated load failure".to_string(),
            });
        }

        Ok(self.records.clone())
    }
}

/// Builds [`CachedDataSource`]s that share one [`MemoryLoader`].
#[derive(Debug, Clone)]
pub struct MemoryDataSourceBuilder {
    loader: Arc<MemoryLoader>,
    builds: Arc<AtomicUsize>,
}

impl MemoryDataSourceBuilder {
    pub fn new(loader: Arc<MemoryLoader>) -> Self {
        Self {
            loader,
            builds: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn from_records(records: Vec<StringRecord>) -> Self {
        Self::new(Arc::new(MemoryLoader::new(records)))
    }

    pub fn loader(&self) -> &Arc<MemoryLoader> {
        &self.loader
    }

    /// Number of data sources built so far.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl DataSourceBuilder for MemoryDataSourceBuilder {
    fn build(
        &self,
        base_name: &str,
        options: &LocalizationOptions,
        metrics: Arc<LookupMetrics>,
    ) -> Result<Arc<dyn DataSource>> {
        let source = CachedDataSource::new(base_name, &options.filter_rule, Arc::clone(&self.loader))?
            .with_metrics(metrics);
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_returns_records_and_counts() {
        let loader = MemoryLoader::new(vec![StringRecord::neutral("Greeting", "Hello")]);
        let records = loader.load("Views.Home").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(loader.fetch_count(), 1);
        assert_eq!(loader.filters(), vec!["Views.Home".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_first_fails_then_recovers() {
        let loader = MemoryLoader::new(vec![]).failing_first(2);
        assert!(loader.load("a.b").await.is_err());
        assert!(loader.load("a.b").await.is_err());
        assert!(loader.load("a.b").await.is_ok());
        assert_eq!(loader.fetch_count(), 3);
    }

    #[test]
    fn test_builder_counts_builds() {
        let builder = MemoryDataSourceBuilder::from_records(vec![]);
        let options = LocalizationOptions::default();
        builder
            .build("MyApp.Views.Home", &options, Arc::new(LookupMetrics::new()))
            .unwrap();
        assert_eq!(builder.build_count(), 1);
    }

    #[test]
    fn test_builder_rejects_short_base_name_without_counting() {
        let builder = MemoryDataSourceBuilder::from_records(vec![]);
        let options = LocalizationOptions::default();
        let result = builder.build("Home", &options, Arc::new(LookupMetrics::new()));
        assert!(result.is_err());
        assert_eq!(builder.build_count(), 0);
    }
}

//! String localizers: keyed, formatted and enumerating lookups over a data source.
//!
//! A localizer never fails a keyed lookup. When a name cannot be resolved the
//! name itself is returned with `resource_not_found` set, and the
//! (name, culture) pair is remembered so later lookups skip the data source.

use crate::culture::Culture;
use crate::data_source::DataSource;
use crate::error::Result;
use crate::format::{format_template, FormatArg};
use crate::metrics::LookupMetrics;
use async_trait::async_trait;
use dashmap::DashSet;
use futures::stream::{self, BoxStream, StreamExt};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedString {
    /// The name that was looked up
    pub name: String,

    /// Resolved value, or the name itself when not found
    pub value: String,

    /// Whether the data source had no value for the name
    pub resource_not_found: bool,

    /// Base name the lookup searched
    pub searched_location: Option<String>,
}

impl LocalizedString {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        resource_not_found: bool,
        searched_location: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            resource_not_found,
            searched_location,
        }
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<LocalizedString> for String {
    fn from(localized: LocalizedString) -> Self {
        localized.value
    }
}

/// The lookup contract a host application consumes.
#[async_trait]
pub trait StringLocalizer: Send + Sync {
    /// Resolve `name`, falling back to `name` itself.
    async fn lookup(&self, name: &str) -> LocalizedString;

    /// Resolve the template for `name` and apply `args` to it.
    ///
    /// When the template is not found, `name` is used as the template.
    /// Placeholders support alignment and the `N`, `F`, `P`, `D` and `X`
    /// specifiers; see [`crate::format`] for the full syntax.
    ///
    /// # Errors
    /// Returns `LocalizationError::Format` if the template is malformed or
    /// refers to a missing argument.
    async fn lookup_formatted(&self, name: &str, args: &[FormatArg]) -> Result<LocalizedString>;

    /// Every string the data source lists for the culture.
    ///
    /// The culture is fixed when this is called; each call returns a fresh
    /// stream.
    ///
    /// # Errors
    /// Returns the load error if the records cannot be loaded.
    async fn get_all_strings(
        &self,
        include_parent_cultures: bool,
    ) -> Result<BoxStream<'static, LocalizedString>>;

    /// A localizer bound to `culture`, or an unbound one for `None`.
    fn with_culture(&self, culture: Option<Culture>) -> Arc<dyn StringLocalizer>;
}

/// Miss-cache key for a name under a culture.
fn miss_key(name: &str, culture_name: &str) -> String {
    format!("{}\0{}", culture_name, name)
}

/// Lookup engine shared by a localizer and its culture-bound views.
struct LocalizerCore {
    base_name: String,
    data_source: Arc<dyn DataSource>,
    missing: DashSet<String>,
    metrics: Arc<LookupMetrics>,
}

impl LocalizerCore {
    /// Resolve `name`, consulting and feeding the miss cache.
    ///
    /// Errors from the data source are logged and treated as misses.
    async fn get_string_safely(&self, name: &str, culture: &Culture) -> Option<String> {
        let key = miss_key(name, culture.name());
        if self.missing.contains(&key) {
            self.metrics.record_short_circuit();
            return None;
        }

        match self.data_source.get_string_for(name, culture).await {
            Ok(Some(value)) => {
                self.metrics.record_hit();
                Some(value)
            }
            Ok(None) => {
                debug!(
                    base_name = %self.base_name,
                    name = %name,
                    culture = %culture,
                    "Localized string not found"
                );
                self.metrics.record_miss();
                self.missing.insert(key);
                None
            }
            Err(e) => {
                warn!(
                    base_name = %self.base_name,
                    name = %name,
                    culture = %culture,
                    error = %e,
                    "Localized string lookup failed, treating as not found"
                );
                self.metrics.record_miss();
                self.missing.insert(key);
                None
            }
        }
    }

    async fn localize(&self, name: &str, culture: &Culture) -> LocalizedString {
        let value = self.get_string_safely(name, culture).await;
        let not_found = value.is_none();
        LocalizedString::new(
            name,
            value.unwrap_or_else(|| name.to_string()),
            not_found,
            Some(self.base_name.clone()),
        )
    }

    async fn localize_formatted(
        &self,
        name: &str,
        args: &[FormatArg],
        culture: &Culture,
    ) -> Result<LocalizedString> {
        let template = self.get_string_safely(name, culture).await;
        let not_found = template.is_none();
        let value = format_template(
            template.as_deref().unwrap_or(name),
            args,
            &culture.number_format(),
        )?;
        Ok(LocalizedString::new(
            name,
            value,
            not_found,
            Some(self.base_name.clone()),
        ))
    }

    async fn all_strings(
        self: &Arc<Self>,
        include_parent_cultures: bool,
        culture: Culture,
    ) -> Result<BoxStream<'static, LocalizedString>> {
        let names = self
            .data_source
            .get_all_names_for(include_parent_cultures, &culture)
            .await?;

        let core = Arc::clone(self);
        Ok(stream::iter(names)
            .then(move |name| {
                let core = Arc::clone(&core);
                let culture = culture.clone();
                async move { core.localize(&name, &culture).await }
            })
            .boxed())
    }
}

impl fmt::Debug for LocalizerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalizerCore")
            .field("base_name", &self.base_name)
            .field("data_source", &self.data_source)
            .field("missing", &self.missing.len())
            .finish()
    }
}

/// Localizer resolving names against the ambient UI culture.
#[derive(Debug, Clone)]
pub struct SqlStringLocalizer {
    core: Arc<LocalizerCore>,
}

impl SqlStringLocalizer {
    pub fn new(base_name: impl Into<String>, data_source: Arc<dyn DataSource>) -> Self {
        Self::with_metrics(base_name, data_source, Arc::new(LookupMetrics::new()))
    }

    pub fn with_metrics(
        base_name: impl Into<String>,
        data_source: Arc<dyn DataSource>,
        metrics: Arc<LookupMetrics>,
    ) -> Self {
        Self {
            core: Arc::new(LocalizerCore {
                base_name: base_name.into(),
                data_source,
                missing: DashSet::new(),
                metrics,
            }),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.core.base_name
    }

    pub fn data_source(&self) -> &Arc<dyn DataSource> {
        &self.core.data_source
    }

    /// Number of (name, culture) pairs remembered as unresolved.
    pub fn missing_count(&self) -> usize {
        self.core.missing.len()
    }

    /// Bind to a fixed culture, sharing this localizer's caches.
    pub fn bind(&self, culture: Culture) -> CultureBoundLocalizer {
        CultureBoundLocalizer {
            core: Arc::clone(&self.core),
            culture,
        }
    }
}

#[async_trait]
impl StringLocalizer for SqlStringLocalizer {
    async fn lookup(&self, name: &str) -> LocalizedString {
        self.core.localize(name, &Culture::current()).await
    }

    async fn lookup_formatted(&self, name: &str, args: &[FormatArg]) -> Result<LocalizedString> {
        self.core
            .localize_formatted(name, args, &Culture::current())
            .await
    }

    async fn get_all_strings(
        &self,
        include_parent_cultures: bool,
    ) -> Result<BoxStream<'static, LocalizedString>> {
        self.core
            .all_strings(include_parent_cultures, Culture::current())
            .await
    }

    fn with_culture(&self, culture: Option<Culture>) -> Arc<dyn StringLocalizer> {
        match culture {
            Some(culture) => Arc::new(self.bind(culture)),
            None => Arc::new(self.clone()),
        }
    }
}

/// Localizer pinned to one culture, ignoring the ambient culture.
///
/// Shares the miss cache and data source of the localizer it came from.
#[derive(Debug, Clone)]
pub struct CultureBoundLocalizer {
    core: Arc<LocalizerCore>,
    culture: Culture,
}

impl CultureBoundLocalizer {
    pub fn culture(&self) -> &Culture {
        &self.culture
    }

    pub fn base_name(&self) -> &str {
        &self.core.base_name
    }
}

#[async_trait]
impl StringLocalizer for CultureBoundLocalizer {
    async fn lookup(&self, name: &str) -> LocalizedString {
        self.core.localize(name, &self.culture).await
    }

    async fn lookup_formatted(&self, name: &str, args: &[FormatArg]) -> Result<LocalizedString> {
        self.core
            .localize_formatted(name, args, &self.culture)
            .await
    }

    async fn get_all_strings(
        &self,
        include_parent_cultures: bool,
    ) -> Result<BoxStream<'static, LocalizedString>> {
        self.core
            .all_strings(include_parent_cultures, self.culture.clone())
            .await
    }

    fn with_culture(&self, culture: Option<Culture>) -> Arc<dyn StringLocalizer> {
        match culture {
            Some(culture) => Arc::new(CultureBoundLocalizer {
                core: Arc::clone(&self.core),
                culture,
            }),
            None => Arc::new(SqlStringLocalizer {
                core: Arc::clone(&self.core),
            }),
        }
    }
}

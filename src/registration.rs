//! Startup wiring: building the shared factory and per-type localizers.
//!
//! # Example
//!
//! ```rust,ignore
//! use sql_localizer::{add_sql_localization, data_source::sql::{COLUMN, CONNECTION_STRING, TABLE}};
//!
//! let factory = add_sql_localization(|options| {
//!     options.data_source.insert(CONNECTION_STRING, "postgres://localhost/app");
//!     options.data_source.insert(TABLE, "LocalizationRecords");
//!     options.data_source.insert(COLUMN, "Text");
//! });
//!
//! // Per request
//! let localizer = factory.create_typed::<HomeController>()?;
//! let greeting = localizer.lookup("Greeting").await;
//! ```

use crate::config::LocalizationOptions;
use crate::culture::Culture;
use crate::data_source::DataSourceBuilder;
use crate::error::Result;
use crate::factory::SqlStringLocalizerFactory;
use crate::format::FormatArg;
use crate::localizer::{LocalizedString, SqlStringLocalizer, StringLocalizer};
use crate::naming::ResourceOwner;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::info;

/// Builder for the process-wide localizer factory.
#[derive(Debug, Default)]
pub struct SqlLocalizationBuilder {
    options: LocalizationOptions,
    data_sources: Option<Arc<dyn DataSourceBuilder>>,
}

impl SqlLocalizationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from options read from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new().with_options(LocalizationOptions::from_env()?))
    }

    pub fn with_options(mut self, options: LocalizationOptions) -> Self {
        self.options = options;
        self
    }

    /// Adjust the options in place.
    pub fn configure(mut self, configure: impl FnOnce(&mut LocalizationOptions)) -> Self {
        configure(&mut self.options);
        self
    }

    /// Back localizers with something other than PostgreSQL.
    pub fn with_data_source_builder(mut self, data_sources: Arc<dyn DataSourceBuilder>) -> Self {
        self.data_sources = Some(data_sources);
        self
    }

    /// Build the shared factory.
    pub fn build(self) -> Arc<SqlStringLocalizerFactory> {
        info!(
            parameters = self.options.data_source.len(),
            resources_path = ?self.options.resources_path,
            "Registering SQL localization"
        );
        let factory = match self.data_sources {
            Some(data_sources) => {
                SqlStringLocalizerFactory::with_data_source_builder(self.options, data_sources)
            }
            None => SqlStringLocalizerFactory::new(self.options),
        };
        Arc::new(factory)
    }
}

/// Register SQL localization with options populated by `configure`.
pub fn add_sql_localization(
    configure: impl FnOnce(&mut LocalizationOptions),
) -> Arc<SqlStringLocalizerFactory> {
    SqlLocalizationBuilder::new().configure(configure).build()
}

/// Localizer for resource owner `T`, handed out per request.
pub struct TypedLocalizer<T> {
    inner: Arc<SqlStringLocalizer>,
    _owner: PhantomData<fn() -> T>,
}

impl<T: ResourceOwner> TypedLocalizer<T> {
    pub(crate) fn new(inner: Arc<SqlStringLocalizer>) -> Self {
        Self {
            inner,
            _owner: PhantomData,
        }
    }

    /// Resolve `T`'s localizer from `factory`.
    pub fn from_factory(factory: &SqlStringLocalizerFactory) -> Result<Self> {
        factory.create_typed::<T>()
    }

    /// The cached localizer this wrapper delegates to.
    pub fn inner(&self) -> &Arc<SqlStringLocalizer> {
        &self.inner
    }
}

impl<T> Clone for TypedLocalizer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _owner: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedLocalizer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedLocalizer")
            .field("owner", &std::any::type_name::<T>())
            .field("base_name", &self.inner.base_name())
            .finish()
    }
}

#[async_trait]
impl<T: ResourceOwner> StringLocalizer for TypedLocalizer<T> {
    async fn lookup(&self, name: &str) -> LocalizedString {
        self.inner.lookup(name).await
    }

    async fn lookup_formatted(&self, name: &str, args: &[FormatArg]) -> Result<LocalizedString> {
        self.inner.lookup_formatted(name, args).await
    }

    async fn get_all_strings(
        &self,
        include_parent_cultures: bool,
    ) -> Result<BoxStream<'static, LocalizedString>> {
        self.inner.get_all_strings(include_parent_cultures).await
    }

    fn with_culture(&self, culture: Option<Culture>) -> Arc<dyn StringLocalizer> {
        self.inner.with_culture(culture)
    }
}

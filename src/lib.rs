//! Database-backed localized string lookup.
//!
//! Localized strings live in a relational table instead of compiled resource
//! files. A [`SqlStringLocalizerFactory`] hands out one [`SqlStringLocalizer`]
//! per base name; each localizer loads its records on first use, answers
//! lookups from memory, and remembers names it could not resolve.
//!
//! # Example
//!
//! ```rust,ignore
//! use sql_localizer::{Culture, SqlLocalizationBuilder, StringLocalizer};
//!
//! let factory = SqlLocalizationBuilder::from_env()?.build();
//! let localizer = factory.create_from_location("Views.Home", "MyApp")?;
//!
//! let greeting = Culture::scope(Culture::new("fr-FR")?, localizer.lookup("Greeting")).await;
//! println!("{}", greeting);
//! ```

pub mod config;
pub mod culture;
pub mod data_source;
pub mod error;
pub mod factory;
pub mod format;
pub mod localizer;
pub mod metrics;
pub mod naming;
pub mod registration;

pub use config::{DataSourceParameters, LocalizationOptions};
pub use culture::{Culture, NumberFormat};
pub use data_source::{DataSource, DataSourceBuilder, RecordLoader, StringRecord};
pub use error::{LocalizationError, Result};
pub use factory::SqlStringLocalizerFactory;
pub use format::FormatArg;
pub use localizer::{CultureBoundLocalizer, LocalizedString, SqlStringLocalizer, StringLocalizer};
pub use metrics::{LookupMetrics, MetricsReport};
pub use naming::{FilterRule, ResourceOwner};
pub use registration::{add_sql_localization, SqlLocalizationBuilder, TypedLocalizer};

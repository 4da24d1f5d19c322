//! Error types for the localization engine.
//!
//! Configuration problems are reported when a data source or localizer is
//! constructed. Backing-store failures are reported when records are loaded.
//! A key that cannot be resolved is never an error; see
//! [`LocalizedString::resource_not_found`](crate::LocalizedString).

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LocalizationError>;

/// Main error type for the localization engine.
#[derive(Debug, Error)]
pub enum LocalizationError {
    // Configuration errors
    #[error("Missing required data source parameter: {key}")]
    MissingParameter { key: String },

    #[error("Base name '{base_name}' has fewer than {required} '{separator}'-separated segments")]
    BaseNameTooShort {
        base_name: String,
        required: usize,
        separator: char,
    },

    #[error("Invalid SQL identifier for {parameter}: '{value}'")]
    InvalidIdentifier { parameter: String, value: String },

    #[error("Invalid connection string: {message}")]
    InvalidConnectionString {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    // Argument errors
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("Invalid culture name: '{0}'")]
    InvalidCulture(String),

    // Backing-store errors
    #[error("Failed to fetch localized strings from table '{table}' (column '{column}', filter '{filter}')")]
    Fetch {
        table: String,
        column: String,
        filter: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to load localized strings for '{filter}': {message}")]
    Load { filter: String, message: String },

    // Formatting errors
    #[error("Invalid format template '{template}': {reason}")]
    Format { template: String, reason: String },
}

impl LocalizationError {
    /// Shorthand for an [`InvalidArgument`](Self::InvalidArgument) error.
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Whether this error indicates a deployment misconfiguration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. }
                | Self::BaseNameTooShort { .. }
                | Self::InvalidIdentifier { .. }
                | Self::InvalidConnectionString { .. }
        )
    }
}

//! Culture type: validated language/region tags and the ambient UI culture.
//!
//! A `Culture` names a translation variant (`fr-FR`, `fr`, `zh-Hant-TW`) or
//! the invariant culture (empty name). The ambient culture of a request is
//! carried in a tokio task-local, so concurrent requests on the same worker
//! thread never see each other's culture.

use crate::error::{LocalizationError, Result};
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::OnceLock;

tokio::task_local! {
    static CURRENT_UI_CULTURE: Culture;
}

/// Separator between the subtags of a culture name.
const SUBTAG_SEPARATOR: char = '-';

fn culture_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,8}(-[A-Za-z0-9]{1,8})*$").expect("culture pattern is valid")
    })
}

/// A validated culture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Culture {
    /// Culture name (e.g., "fr-FR"); empty for the invariant culture
    name: String,
}

impl Culture {
    /// Create a culture from its name.
    ///
    /// # Arguments
    /// * `name` - A language tag such as "fr-FR" or "de", or "" for invariant
    ///
    /// # Returns
    /// * `Ok(Culture)` if the name is well formed
    /// * `Err(LocalizationError::InvalidCulture)` otherwise
    pub fn new(name: &str) -> Result<Culture> {
        if name.is_empty() || culture_name_pattern().is_match(name) {
            Ok(Culture {
                name: name.to_string(),
            })
        } else {
            Err(LocalizationError::InvalidCulture(name.to_string()))
        }
    }

    /// The invariant culture (empty name). Neutral records are stored under it.
    pub fn invariant() -> Culture {
        Culture::default()
    }

    /// Get the culture name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the invariant culture.
    pub fn is_invariant(&self) -> bool {
        self.name.is_empty()
    }

    /// Get the parent culture: "fr-FR" → "fr" → invariant → invariant.
    pub fn parent(&self) -> Culture {
        Culture {
            name: parent_name(&self.name).to_string(),
        }
    }

    /// Number formatting conventions for this culture.
    pub fn number_format(&self) -> NumberFormat {
        NumberFormat::for_language(self.language())
    }

    /// Lowercased primary language subtag ("fr" for "fr-FR").
    fn language(&self) -> String {
        self.name
            .split(SUBTAG_SEPARATOR)
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Get the ambient UI culture of the current task.
    ///
    /// Falls back to the invariant culture outside of [`Culture::scope`].
    pub fn current() -> Culture {
        CURRENT_UI_CULTURE
            .try_with(Culture::clone)
            .unwrap_or_else(|_| Culture::invariant())
    }

    /// Run `future` with `culture` as its ambient UI culture.
    pub async fn scope<F: Future>(culture: Culture, future: F) -> F::Output {
        CURRENT_UI_CULTURE.scope(culture, future).await
    }

    /// Run `f` synchronously with `culture` as the ambient UI culture.
    pub fn sync_scope<R>(culture: Culture, f: impl FnOnce() -> R) -> R {
        CURRENT_UI_CULTURE.sync_scope(culture, f)
    }
}

/// Parent name of a culture name without validating it.
///
/// Stored record culture names are compared through this, so a malformed
/// name in the table never fails a lookup.
pub(crate) fn parent_name(name: &str) -> &str {
    match name.rsplit_once(SUBTAG_SEPARATOR) {
        Some((parent, _)) => parent,
        None => "",
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FromStr for Culture {
    type Err = LocalizationError;

    fn from_str(s: &str) -> Result<Self> {
        Culture::new(s)
    }
}

/// Separators a culture uses when rendering numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub group_separator: char,
}

impl NumberFormat {
    /// Invariant conventions: "1,234.5"
    pub const INVARIANT: NumberFormat = NumberFormat {
        decimal_separator: '.',
        group_separator: ',',
    };

    fn for_language(language: String) -> NumberFormat {
        match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da" | "el" | "ro" | "sr" | "hr"
            | "sl" => NumberFormat {
                decimal_separator: ',',
                group_separator: '.',
            },
            "fr" | "ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "no" | "uk" | "hu" | "bg" => {
                NumberFormat {
                    decimal_separator: ',',
                    group_separator: ' ',
                }
            }
            _ => NumberFormat::INVARIANT,
        }
    }
}

//! Base-name composition: from resource owners to string-table identifiers.
//!
//! A base name identifies one logical group of strings
//! (e.g. "MyApp.Views.Home.Index"). It is derived either from a
//! [`ResourceOwner`] or from an explicit base-name/location pair, and is
//! narrowed by a [`FilterRule`] into the path filter a data source loads with.

use crate::error::{LocalizationError, Result};
use serde::Deserialize;

/// Separator between base-name segments.
pub const SEGMENT_SEPARATOR: char = '.';

/// An owner of localized strings, registered with its qualified name.
///
/// Implement this for any type that asks the factory for a localizer:
///
/// ```rust,ignore
/// struct HomeController;
///
/// impl ResourceOwner for HomeController {
///     const FULL_NAME: &'static str = "MyApp.Controllers.HomeController";
///     const MODULE: &'static str = "MyApp";
/// }
/// ```
pub trait ResourceOwner: 'static {
    /// Fully-qualified name of the owner, dot-separated.
    const FULL_NAME: &'static str;

    /// Identity of the module the owner is declared in (its root namespace).
    const MODULE: &'static str;
}

/// Rule narrowing a base name to the path filter used when loading records.
///
/// The filter keeps the last `segments` segments of the base name, i.e.
/// the text after the `segments`-th separator from the end. Base names with
/// fewer than `segments` segments are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FilterRule {
    pub separator: char,
    pub segments: usize,
}

impl Default for FilterRule {
    fn default() -> Self {
        Self {
            separator: SEGMENT_SEPARATOR,
            segments: 2,
        }
    }
}

impl FilterRule {
    /// Create a rule keeping the trailing `segments` segments.
    pub fn new(separator: char, segments: usize) -> Result<Self> {
        if segments == 0 {
            return Err(LocalizationError::invalid_argument(
                "segments",
                "filter rule must keep at least one segment",
            ));
        }
        Ok(Self {
            separator,
            segments,
        })
    }

    /// Derive the load filter for `base_name`.
    ///
    /// "MyApp.Views.Home.Index" with the default rule yields "Home.Index".
    pub fn derive_filter(&self, base_name: &str) -> Result<String> {
        let parts: Vec<&str> = base_name.split(self.separator).collect();
        if parts.len() < self.segments {
            return Err(LocalizationError::BaseNameTooShort {
                base_name: base_name.to_string(),
                required: self.segments,
                separator: self.separator,
            });
        }

        let kept = &parts[parts.len() - self.segments..];
        Ok(kept.join(&self.separator.to_string()))
    }
}

/// Base name for a resource owner.
///
/// Without a resources path this is the owner's full name. With one, the
/// path is inserted between the module and the module-relative name:
/// `MyApp` + `Resources` + `MyApp.Views.Home` → `MyApp.Resources.Views.Home`.
pub fn base_name_for_owner(full_name: &str, module: &str, resources_path: Option<&str>) -> String {
    match normalized_resources_path(resources_path) {
        Some(path) => format!(
            "{}.{}.{}",
            module,
            path,
            trim_prefix(full_name, &format!("{}{}", module, SEGMENT_SEPARATOR))
        ),
        None => full_name.to_string(),
    }
}

/// Base name for an explicit base name relative to a location.
///
/// The location prefix is trimmed from `base_name` once and re-applied, so
/// "Views.Home" at "MyApp" and "MyApp.Views.Home" at "MyApp" agree.
pub fn base_name_for_location(base_name: &str, location: &str, resources_path: Option<&str>) -> String {
    let relative = trim_prefix(base_name, &format!("{}{}", location, SEGMENT_SEPARATOR));
    match normalized_resources_path(resources_path) {
        Some(path) => format!("{}.{}.{}", location, path, relative),
        None => format!("{}.{}", location, relative),
    }
}

/// Cache key for localizers created from a base-name/location pair.
///
/// Distinct from plain base names so the two creation paths never collide.
pub fn location_cache_key(base_name: &str, location: &str) -> String {
    format!("B={},L={}", base_name, location)
}

fn trim_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    name.strip_prefix(prefix).unwrap_or(name)
}

/// "Resources/Shared" → "Resources.Shared"; empty paths are ignored.
fn normalized_resources_path(resources_path: Option<&str>) -> Option<String> {
    let path = resources_path?
        .trim_matches(|c: char| c == '/' || c == '\\')
        .replace(['/', '\\'], ".");
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== FilterRule Tests ====================

    #[test]
    fn test_default_filter_keeps_last_two_segments() {
        let rule = FilterRule::default();
        let filter = rule.derive_filter("MyApp.Views.Home.Index").unwrap();
        assert_eq!(filter, "Home.Index");
    }

    #[test]
    fn test_filter_with_exactly_required_segments() {
        let rule = FilterRule::default();
        assert_eq!(rule.derive_filter("Views.Home").unwrap(), "Views.Home");
    }

    #[test]
    fn test_filter_too_few_segments_is_configuration_error() {
        let rule = FilterRule::default();
        let err = rule.derive_filter("Index").unwrap_err();
        assert!(matches!(err, LocalizationError::BaseNameTooShort { required: 2, .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_filter_custom_rule() {
        let rule = FilterRule::new('/', 3).unwrap();
        assert_eq!(rule.derive_filter("a/b/c/d/e").unwrap(), "c/d/e");
        assert!(rule.derive_filter("a/b").is_err());
    }

    #[test]
    fn test_filter_rule_rejects_zero_segments() {
        assert!(FilterRule::new('.', 0).is_err());
    }

    // ==================== Owner Base Name Tests ====================

    #[test]
    fn test_owner_base_name_without_resources_path() {
        let name = base_name_for_owner("MyApp.Views.Home", "MyApp", None);
        assert_eq!(name, "MyApp.Views.Home");
    }

    #[test]
    fn test_owner_base_name_with_resources_path() {
        let name = base_name_for_owner("MyApp.Views.Home", "MyApp", Some("Resources"));
        assert_eq!(name, "MyApp.Resources.Views.Home");
    }

    #[test]
    fn test_owner_base_name_with_nested_resources_path() {
        let name = base_name_for_owner("MyApp.Views.Home", "MyApp", Some("/Strings/Shared/"));
        assert_eq!(name, "MyApp.Strings.Shared.Views.Home");
    }

    #[test]
    fn test_owner_base_name_empty_resources_path_ignored() {
        let name = base_name_for_owner("MyApp.Views.Home", "MyApp", Some(""));
        assert_eq!(name, "MyApp.Views.Home");
    }

    // ==================== Location Base Name Tests ====================

    #[test]
    fn test_location_base_name_trims_prefix() {
        let name = base_name_for_location("MyApp.Views.Home", "MyApp", None);
        assert_eq!(name, "MyApp.Views.Home");
    }

    #[test]
    fn test_location_base_name_relative_name() {
        let name = base_name_for_location("Views.Home", "MyApp", None);
        assert_eq!(name, "MyApp.Views.Home");
    }

    #[test]
    fn test_location_base_name_with_resources_path() {
        let name = base_name_for_location("Views.Home", "MyApp", Some("Resources"));
        assert_eq!(name, "MyApp.Resources.Views.Home");
    }

    #[test]
    fn test_location_cache_key_format() {
        assert_eq!(location_cache_key("Views.Home", "MyApp"), "B=Views.Home,L=MyApp");
        assert_ne!(location_cache_key("Views.Home", "MyApp"), "MyApp.Views.Home");
    }
}

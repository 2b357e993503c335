//! Dotted logger-name helpers.
//!
//! Logger names form a hierarchy split on `.`: the parent of
//! `org.example.foo` is `org.example`, whose parent is `org`, whose parent
//! is the root logger. The root is named `""`; `"root"` (any case) is
//! accepted as an alias.
//!
//! Lookups accept any string. [`validate_logger_name`] is used by the
//! configuration layer, where a malformed name is an operator mistake
//! worth reporting:
//! - Must be non-empty
//! - Must not contain whitespace or control characters
//! - Must not start or end with `.`
//! - Components between dots must be non-empty

use crate::error::TypeError;

/// Canonical name of the root logger.
pub const ROOT_LOGGER_NAME: &str = "";

/// Returns `true` if `name` refers to the root logger.
pub fn is_root_name(name: &str) -> bool {
    name.is_empty() || name.eq_ignore_ascii_case("root")
}

/// The parent of `name`, or `None` for the root itself.
///
/// ```
/// use plume_types::parent_name;
///
/// assert_eq!(parent_name("org.example.foo"), Some("org.example"));
/// assert_eq!(parent_name("org"), Some(""));
/// assert_eq!(parent_name(""), None);
/// ```
pub fn parent_name(name: &str) -> Option<&str> {
    if is_root_name(name) {
        return None;
    }
    match name.rfind('.') {
        Some(idx) => Some(&name[..idx]),
        None => Some(ROOT_LOGGER_NAME),
    }
}

/// Iterate the ancestors of `name`, nearest first, ending at the root.
pub fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(parent_name(name), |current| parent_name(*current))
}

/// Validate a configured logger name, returning `Ok(())` if valid.
pub fn validate_logger_name(name: &str) -> Result<(), TypeError> {
    let invalid = |reason: &str| TypeError::InvalidLoggerName {
        name: name.to_string(),
        reason: reason.into(),
    };

    if name.is_empty() {
        return Err(invalid("logger name must not be empty"));
    }
    if name.chars().any(|ch| ch.is_whitespace() || ch.is_control()) {
        return Err(invalid("must not contain whitespace or control characters"));
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Err(invalid("must not start or end with '.'"));
    }
    if name.split('.').any(str::is_empty) {
        return Err(invalid("name components must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_aliases() {
        assert!(is_root_name(""));
        assert!(is_root_name("root"));
        assert!(is_root_name("ROOT"));
        assert!(!is_root_name("rooted"));
    }

    #[test]
    fn ancestors_walk_to_root() {
        let chain: Vec<&str> = ancestors("a.b.c").collect();
        assert_eq!(chain, vec!["a.b", "a", ""]);
    }

    #[test]
    fn root_has_no_ancestors() {
        assert_eq!(ancestors("").count(), 0);
        assert_eq!(ancestors("root").count(), 0);
    }

    #[test]
    fn odd_names_still_terminate() {
        let chain: Vec<&str> = ancestors("a..b").collect();
        assert_eq!(chain, vec!["a.", "a", ""]);
    }

    #[test]
    fn valid_names() {
        assert!(validate_logger_name("org").is_ok());
        assert!(validate_logger_name("org.example.foo").is_ok());
        assert!(validate_logger_name("my_app.db-pool").is_ok());
    }

    #[test]
    fn reject_malformed_names() {
        assert!(validate_logger_name("").is_err());
        assert!(validate_logger_name(".leading").is_err());
        assert!(validate_logger_name("trailing.").is_err());
        assert!(validate_logger_name("a..b").is_err());
        assert!(validate_logger_name("has space").is_err());
        assert!(validate_logger_name("tab\tname").is_err());
    }
}

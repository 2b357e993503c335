//! Message resolution for localized logging calls.

use std::collections::HashMap;
use std::fmt;

/// Source of localized message patterns, keyed by message id.
pub trait ResourceBundle: Send + Sync {
    /// The pattern for `key`, or `None` if this bundle has no entry.
    fn get_string(&self, key: &str) -> Option<String>;
}

/// A `HashMap`-backed [`ResourceBundle`].
#[derive(Clone, Debug, Default)]
pub struct MapBundle {
    entries: HashMap<String, String>,
}

impl MapBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn with_entry(mut self, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.entries.insert(key.into(), pattern.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapBundle
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ResourceBundle for MapBundle {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Substitute `{0}`, `{1}`, … in `pattern` with the `Display` text of the
/// corresponding parameter.
///
/// Placeholders whose index is out of range, or that are not a plain
/// decimal index, are left untouched.
pub fn format_pattern(pattern: &str, params: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let param = params.get(index)?;
            Some((param.to_string(), close))
        });
        match substituted {
            Some((text, close)) => {
                out.push_str(&text);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

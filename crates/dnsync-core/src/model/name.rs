// # Zone names
//
// Zones are always handled in absolute form internally ("unit.tests.") and
// stripped to the bare form ("unit.tests") only at the wire boundary.
//
// `add_trailing_dot` / `remove_trailing_dot` are strict: callers must know
// which form they hold. Getting it wrong is a bug in the caller, so both
// helpers panic instead of returning an error. `ZoneName` exists so that
// most code never has to call them directly.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Append the trailing dot to a relative name.
///
/// # Panics
///
/// Panics if `value` already ends with `.`.
pub fn add_trailing_dot(value: &str) -> String {
    assert!(!value.ends_with('.'), "Value already has trailing dot");
    format!("{value}.")
}

/// Strip the trailing dot from an absolute name.
///
/// # Panics
///
/// Panics if `value` does not end with `.`.
pub fn remove_trailing_dot(value: &str) -> &str {
    assert!(value.ends_with('.'), "Value already missing trailing dot");
    &value[..value.len() - 1]
}

/// An absolute zone name, always carrying its trailing dot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneName(String);

impl ZoneName {
    /// Build a zone name from either the dotted or the bare form
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        let bare = name.strip_suffix('.').unwrap_or(name);

        if bare.is_empty() {
            return Err(Error::invalid_input("Zone name cannot be empty"));
        }
        if bare.chars().any(char::is_whitespace) {
            return Err(Error::invalid_input(format!(
                "Zone name contains whitespace: '{name}'"
            )));
        }
        if bare.split('.').any(str::is_empty) {
            return Err(Error::invalid_input(format!(
                "Zone name has empty label: '{name}'"
            )));
        }

        Ok(Self(add_trailing_dot(bare)))
    }

    /// The absolute form, e.g. `unit.tests.`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The wire form, e.g. `unit.tests`
    pub fn without_trailing_dot(&self) -> &str {
        remove_trailing_dot(&self.0)
    }

    /// Absolute name of `name` inside this zone; the empty name is the apex.
    pub fn fqdn(&self, name: &str) -> String {
        if name.is_empty() {
            self.0.clone()
        } else {
            format!("{name}.{}", self.0)
        }
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ZoneName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ZoneName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ZoneName> for String {
    fn from(name: ZoneName) -> Self {
        name.0
    }
}

impl AsRef<str> for ZoneName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

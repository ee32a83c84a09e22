//! Application preferences
//!
//! A small ordered string-to-string map with typed accessors, handed to
//! document initialization so hosts can seed new documents from program
//! settings.

use std::collections::BTreeMap;

use crate::utils::errors::{CoreError, Result};

/// Ordered string-keyed settings map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    values: BTreeMap<String, String>,
}

impl Preferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// The raw value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The value under `key` parsed as a boolean (`true`/`false`).
    ///
    /// # Errors
    ///
    /// [`CoreError::KeyNotFound`] if the key is absent,
    /// [`CoreError::Parse`] if the value does not parse.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.parse(key, "bool")
    }

    /// The value under `key` parsed as a signed integer.
    ///
    /// # Errors
    ///
    /// [`CoreError::KeyNotFound`] if the key is absent,
    /// [`CoreError::Parse`] if the value does not parse.
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        self.parse(key, "i64")
    }

    /// The value under `key` parsed as a float.
    ///
    /// # Errors
    ///
    /// [`CoreError::KeyNotFound`] if the key is absent,
    /// [`CoreError::Parse`] if the value does not parse.
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.parse(key, "f64")
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn parse<T: core::str::FromStr>(&self, key: &str, expected: &'static str) -> Result<T> {
        let raw = self.values.get(key).ok_or_else(|| CoreError::KeyNotFound {
            key: key.to_string(),
        })?;
        raw.parse().map_err(|_| CoreError::Parse {
            key: key.to_string(),
            value: raw.clone(),
            expected,
        })
    }
}

//! Form payloads submitted to create/update operations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{DocketError, Result, Value, parse_date, parse_time};

/// Field-keyed working data of an edit form.
///
/// Values are kept as the raw strings a user typed; typed records parse
/// them in their `FromForm` implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    values: IndexMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw value of a field (empty string when missing)
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Set the raw value of a field
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Trimmed text value, `None` when blank
    pub fn text(&self, name: &str) -> Option<String> {
        let value = self.get(name).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Required trimmed text value
    pub fn required_text(&self, name: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| DocketError::InvalidValue(format!("{} is required", name)))
    }

    /// Optional date value in `YYYY-MM-DD` form
    pub fn date(&self, name: &str) -> Result<Option<chrono::NaiveDate>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => parse_date(&raw)
                .map(Some)
                .ok_or_else(|| DocketError::InvalidValue(format!("{}: invalid date '{}'", name, raw))),
        }
    }

    /// Optional time value in `HH:MM[:SS]` form
    pub fn time(&self, name: &str) -> Result<Option<chrono::NaiveTime>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => parse_time(&raw)
                .map(Some)
                .ok_or_else(|| DocketError::InvalidValue(format!("{}: invalid time '{}'", name, raw))),
        }
    }

    /// Integer value; blank fields read as zero
    pub fn int(&self, name: &str) -> Result<i64> {
        match self.text(name) {
            None => Ok(0),
            Some(raw) => Value::String(raw.clone())
                .as_i64()
                .ok_or_else(|| DocketError::InvalidValue(format!("{}: invalid number '{}'", name, raw))),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut form = FormData::new();
        for (k, v) in iter {
            form.set(k, v);
        }
        form
    }
}

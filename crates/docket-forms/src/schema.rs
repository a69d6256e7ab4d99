//! Form schemas: defaults, record pre-population and validation

use std::sync::LazyLock;

use chrono::NaiveDate;
use docket_core::{DATE_FORMAT, FormData, Record, TIME_FORMAT, Value, parse_date, parse_time};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{FieldConfig, FieldKind};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Whether `input` looks like an email address
pub fn is_valid_email(input: &str) -> bool {
    EMAIL_REGEX.is_match(input.trim())
}

/// Errors in a form declaration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("select field '{0}' has no options")]
    EmptyOptions(String),

    #[error("field names must not be empty")]
    EmptyName,
}

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: IndexMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Drop the message for one field; returns whether there was one
    pub fn remove(&mut self, field: &str) -> bool {
        self.errors.shift_remove(field).is_some()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.errors {
            self.errors.entry(field).or_insert(message);
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The ordered fields of one record form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    fields: Vec<FieldConfig>,
}

impl FormSchema {
    /// Create a schema, rejecting duplicate names and option-less selects
    pub fn new(fields: Vec<FieldConfig>) -> Result<Self, FormError> {
        let mut seen = std::collections::HashSet::new();
        for field in &fields {
            if field.name.trim().is_empty() {
                return Err(FormError::EmptyName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(FormError::DuplicateField(field.name.clone()));
            }
            if field.kind == FieldKind::Select && field.options.is_empty() {
                return Err(FormError::EmptyOptions(field.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Blank form: today's date for date fields, empty strings otherwise
    pub fn defaults(&self, today: NaiveDate) -> FormData {
        self.fields
            .iter()
            .map(|field| {
                let value = match field.kind {
                    FieldKind::Date => today.format(DATE_FORMAT).to_string(),
                    _ => String::new(),
                };
                (field.name.clone(), value)
            })
            .collect()
    }

    /// Form data pre-populated from `record`, one entry per field.
    ///
    /// Date fields are normalized to `YYYY-MM-DD` and time fields to
    /// `HH:MM`; values that do not parse are kept as they are.
    pub fn from_record<R: Record>(&self, record: &R) -> FormData {
        self.fields
            .iter()
            .map(|field| {
                let value = record.field(&field.name);
                (field.name.clone(), form_value(field.kind, &value))
            })
            .collect()
    }

    /// Validate form data against every field.
    ///
    /// Missing required values are reported first; format checks only
    /// apply to non-blank values.
    pub fn validate(&self, form: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            if let Some(message) = validate_field(field, form.get(&field.name)) {
                errors.insert(field.name.clone(), message);
            }
        }
        errors
    }
}

fn form_value(kind: FieldKind, value: &Value) -> String {
    match (kind, value) {
        (_, Value::Null) => String::new(),
        (FieldKind::Date, value) => match value.as_date() {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => value.to_string(),
        },
        (FieldKind::Time, Value::Time(time)) => time.format(TIME_FORMAT).to_string(),
        (FieldKind::Time, Value::DateTime(dt)) => dt.time().format(TIME_FORMAT).to_string(),
        (FieldKind::Time, Value::String(raw)) => match parse_time(raw) {
            Some(time) => time.format(TIME_FORMAT).to_string(),
            None => raw.clone(),
        },
        (_, value) => value.to_string(),
    }
}

fn validate_field(field: &FieldConfig, raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return field
            .required
            .then(|| format!("{} is required", field.label));
    }

    match field.kind {
        FieldKind::Text | FieldKind::Textarea => None,
        FieldKind::Email => {
            (!is_valid_email(value)).then(|| "Enter a valid email address".to_string())
        }
        FieldKind::Date => {
            let well_formed = DATE_REGEX.is_match(value) && parse_date(value).is_some();
            (!well_formed).then(|| format!("{} must be a date (YYYY-MM-DD)", field.label))
        }
        FieldKind::Time => parse_time(value)
            .is_none()
            .then(|| format!("{} must be a time (HH:MM)", field.label)),
        FieldKind::Select => (!field.options.iter().any(|option| option == value))
            .then(|| format!("{} must be one of: {}", field.label, field.options.join(", "))),
    }
}

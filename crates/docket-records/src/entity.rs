//! The per-entity configuration shared by every court record type

use std::fmt;
use std::str::FromStr;

use docket_core::{FormData, FromForm, Record, RecordSchema, Value};
use docket_forms::{Drawer, FieldConfig, FieldErrors, FormError, FormSchema};
use docket_table::{ColumnEntry, FilterSchema, RecordTable, SortConfig, TableError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid table or form configuration for an entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid table configuration: {0}")]
    Table(#[from] TableError),

    #[error("invalid form configuration: {0}")]
    Form(#[from] FormError),
}

/// A court record type with its table, form and filter configuration
pub trait Entity: Record + RecordSchema + FromForm + Serialize + DeserializeOwned {
    /// Singular display name, used in prompts and notifications
    const TITLE: &'static str;

    /// Plural name, used for storage file names
    const PLURAL: &'static str;

    fn columns() -> Vec<ColumnEntry<Self>>;

    fn form_fields() -> Vec<FieldConfig>;

    fn filter_schema() -> FilterSchema;

    fn default_sort() -> Option<SortConfig> {
        None
    }

    /// Field whose value must be unique across the collection
    fn unique_field() -> Option<&'static str> {
        None
    }

    /// Cross-field rules checked before the review step
    fn validate_form(_form: &FormData) -> FieldErrors {
        FieldErrors::new()
    }

    fn form_schema() -> Result<FormSchema, ConfigError> {
        Ok(FormSchema::new(Self::form_fields())?)
    }

    /// Table with checked column keys, filters and default sort applied
    fn table(page_size: usize) -> Result<RecordTable<Self>, ConfigError> {
        let mut table = RecordTable::checked(Self::columns(), Self::FIELDS)?
            .with_filter_schema(Self::filter_schema())
            .with_page_size(page_size);
        if let Some(sort) = Self::default_sort() {
            table = table.with_initial_sort(sort);
        }
        Ok(table)
    }

    fn drawer() -> Result<Drawer<Self>, ConfigError> {
        Ok(Drawer::new(Self::TITLE, Self::form_schema()?).with_validator(Self::validate_form))
    }
}

/// The record types known to docket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Case,
    Petition,
    ReceiveLog,
    AnnualStatistic,
    MonthlyStatistic,
}

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Case,
            EntityKind::Petition,
            EntityKind::ReceiveLog,
            EntityKind::AnnualStatistic,
            EntityKind::MonthlyStatistic,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Petition => "petition",
            Self::ReceiveLog => "receive_log",
            Self::AnnualStatistic => "annual_statistic",
            Self::MonthlyStatistic => "monthly_statistic",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| format!("unknown record kind '{}'", s))
    }
}

/// Trimmed text as a value; blank text is treated as missing
pub(crate) fn text_value(text: &str) -> Value {
    let text = text.trim();
    if text.is_empty() {
        Value::Null
    } else {
        Value::String(text.to_string())
    }
}

/// Collect a non-negative integer field error into `errors`
pub(crate) fn check_count(form: &FormData, name: &str, label: &str, errors: &mut FieldErrors) {
    let raw = form.get(name).trim();
    if raw.is_empty() {
        return;
    }
    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => {}
        _ => errors.insert(name, format!("{} must be a whole number", label)),
    }
}

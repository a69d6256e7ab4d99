//! Per-field filter constraints
//!
//! A filter set is a field-keyed map of constraints combined with logical
//! AND. Text constraints match either the full value or a substring
//! (case-insensitive), chosen per field by the exact-match flag; date
//! constraints are inclusive `[start, end]` ranges.

use std::collections::HashMap;

use chrono::NaiveDate;
use docket_core::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of constraint a filterable field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Text,
    DateRange,
}

impl FilterKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::DateRange => "date range",
        }
    }
}

/// A single field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    Text(String),
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self::DateRange { start, end }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Text(_) => FilterKind::Text,
            Self::DateRange { .. } => FilterKind::DateRange,
        }
    }

    /// An empty constraint places no restriction on its field
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::DateRange { start, end } => start.is_none() && end.is_none(),
        }
    }
}

/// Errors raised when a constraint does not fit the table's filter schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("'{0}' is not a filterable field")]
    UnknownField(String),

    #[error("'{field}' expects a {} filter", .expected.label())]
    KindMismatch { field: String, expected: FilterKind },
}

/// Declares one filterable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    pub name: String,
    pub label: String,
    pub kind: FilterKind,
}

impl FilterField {
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FilterKind::Text,
        }
    }

    pub fn date_range(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FilterKind::DateRange,
        }
    }
}

/// The set of fields a table allows filtering on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSchema {
    fields: Vec<FilterField>,
}

impl FilterSchema {
    pub fn new(fields: Vec<FilterField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check that a constraint targets a known field of the right kind
    pub fn check(&self, name: &str, value: &FilterValue) -> Result<(), FilterError> {
        let field = self
            .get(name)
            .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
        if field.kind != value.kind() {
            return Err(FilterError::KindMismatch {
                field: name.to_string(),
                expected: field.kind,
            });
        }
        Ok(())
    }

    /// Check every constraint of a filter set
    pub fn validate(&self, values: &FilterValues) -> Result<(), FilterError> {
        values
            .iter()
            .try_for_each(|(name, value)| self.check(name, value))
    }
}

/// Field-keyed constraint values, in the order they were set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterValues {
    values: IndexMap<String, FilterValue>,
}

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.set(field, value);
        self
    }

    /// Set a constraint; returns true if the stored value changed
    pub fn set(&mut self, field: impl Into<String>, value: FilterValue) -> bool {
        let field = field.into();
        if self.values.get(&field) == Some(&value) {
            return false;
        }
        self.values.insert(field, value);
        true
    }

    /// Remove a constraint; returns true if one was present
    pub fn remove(&mut self, field: &str) -> bool {
        self.values.shift_remove(field).is_some()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.values.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of constraints that actually restrict results
    pub fn active_count(&self) -> usize {
        self.values.values().filter(|v| !v.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

/// Per-field toggle between full-string equality and substring matching.
///
/// Fields without an explicit flag use exact matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExactMatchMap {
    flags: HashMap<String, bool>,
}

impl ExactMatchMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, exact: bool) -> Self {
        self.set(field, exact);
        self
    }

    /// Set the flag; returns true if the effective value changed
    pub fn set(&mut self, field: impl Into<String>, exact: bool) -> bool {
        let field = field.into();
        let changed = self.is_exact(&field) != exact;
        self.flags.insert(field, exact);
        changed
    }

    pub fn is_exact(&self, field: &str) -> bool {
        self.flags.get(field).copied().unwrap_or(true)
    }
}

/// Keep the records that satisfy every active constraint.
///
/// Relative order of the input is preserved.
pub fn apply<'a, R: Record>(
    records: &[&'a R],
    constraints: &FilterValues,
    exact: &ExactMatchMap,
) -> Vec<&'a R> {
    if constraints.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .copied()
        .filter(|record| matches(*record, constraints, exact))
        .collect()
}

/// Whether a single record satisfies every active constraint
pub fn matches<R: Record>(record: &R, constraints: &FilterValues, exact: &ExactMatchMap) -> bool {
    constraints
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .all(|(field, value)| match value {
            FilterValue::Text(needle) => {
                text_matches(&record.field(field).to_string(), needle, exact.is_exact(field))
            }
            FilterValue::DateRange { start, end } => {
                let Some(date) = record.field(field).as_date() else {
                    return false;
                };
                start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
            }
        })
}

/// Case-insensitive, ignoring surrounding whitespace on both sides
fn text_matches(haystack: &str, needle: &str, exact: bool) -> bool {
    let haystack = haystack.trim().to_lowercase();
    let needle = needle.trim().to_lowercase();
    if exact {
        haystack == needle
    } else {
        haystack.contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_core::{DynamicRecord, RecordId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids(records: &[&DynamicRecord]) -> Vec<RecordId> {
        records.iter().map(|r| r.id()).collect()
    }

    fn branches() -> Vec<DynamicRecord> {
        vec![
            DynamicRecord::new(1).with("branch", "A"),
            DynamicRecord::new(2).with("branch", "AB"),
        ]
    }

    #[test]
    fn test_exact_match_filter() {
        let records = branches();
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let constraints = FilterValues::new().with("branch", FilterValue::text("A"));

        let exact = ExactMatchMap::new().with("branch", true);
        assert_eq!(ids(&apply(&refs, &constraints, &exact)), vec![RecordId::Int(1)]);

        let substring = ExactMatchMap::new().with("branch", false);
        assert_eq!(
            ids(&apply(&refs, &constraints, &substring)),
            vec![RecordId::Int(1), RecordId::Int(2)]
        );
    }

    #[test]
    fn test_exact_is_default_and_case_insensitive() {
        let records = branches();
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let constraints = FilterValues::new().with("branch", FilterValue::text("ab"));
        assert_eq!(
            ids(&apply(&refs, &constraints, &ExactMatchMap::new())),
            vec![RecordId::Int(2)]
        );
    }

    #[test]
    fn test_exact_match_ignores_stored_padding() {
        let records = vec![
            DynamicRecord::new(1).with("branch", "A "),
            DynamicRecord::new(2).with("branch", " AB"),
        ];
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let constraints = FilterValues::new().with("branch", FilterValue::text("a"));
        assert_eq!(
            ids(&apply(&refs, &constraints, &ExactMatchMap::new())),
            vec![RecordId::Int(1)]
        );
    }

    #[test]
    fn test_empty_constraint_is_skipped() {
        let records = branches();
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let constraints = FilterValues::new()
            .with("branch", FilterValue::text("   "))
            .with("filed_on", FilterValue::range(None, None));
        assert_eq!(apply(&refs, &constraints, &ExactMatchMap::new()).len(), 2);
        assert!(constraints.is_empty());
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let records = vec![
            DynamicRecord::new(1).with("filed_on", date(2024, 1, 1)),
            DynamicRecord::new(2).with("filed_on", date(2024, 1, 15)),
            DynamicRecord::new(3).with("filed_on", date(2024, 1, 31)),
            DynamicRecord::new(4).with("filed_on", date(2024, 2, 1)),
        ];
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let constraints = FilterValues::new().with(
            "filed_on",
            FilterValue::range(Some(date(2024, 1, 1)), Some(date(2024, 1, 31))),
        );
        assert_eq!(
            ids(&apply(&refs, &constraints, &ExactMatchMap::new())),
            vec![RecordId::Int(1), RecordId::Int(2), RecordId::Int(3)]
        );
    }

    #[test]
    fn test_open_ended_range_and_string_dates() {
        let records = vec![
            DynamicRecord::new(1).with("filed_on", "2023-12-31"),
            DynamicRecord::new(2).with("filed_on", "2024-03-01T09:00:00Z"),
            DynamicRecord::new(3),
        ];
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let constraints =
            FilterValues::new().with("filed_on", FilterValue::range(Some(date(2024, 1, 1)), None));
        assert_eq!(
            ids(&apply(&refs, &constraints, &ExactMatchMap::new())),
            vec![RecordId::Int(2)]
        );
    }

    #[test]
    fn test_constraints_combine_with_and() {
        let records = vec![
            DynamicRecord::new(1).with("branch", "A").with("status", "open"),
            DynamicRecord::new(2).with("branch", "A").with("status", "closed"),
            DynamicRecord::new(3).with("branch", "B").with("status", "open"),
        ];
        let refs: Vec<&DynamicRecord> = records.iter().collect();
        let constraints = FilterValues::new()
            .with("branch", FilterValue::text("a"))
            .with("status", FilterValue::text("open"));
        assert_eq!(
            ids(&apply(&refs, &constraints, &ExactMatchMap::new())),
            vec![RecordId::Int(1)]
        );
    }

    #[test]
    fn test_schema_rejects_unknown_field_and_kind_mismatch() {
        let schema = FilterSchema::new(vec![
            FilterField::text("branch", "Branch"),
            FilterField::date_range("filed_on", "Filed"),
        ]);
        assert_eq!(
            schema.check("judge", &FilterValue::text("x")),
            Err(FilterError::UnknownField("judge".into()))
        );
        assert_eq!(
            schema.check("filed_on", &FilterValue::text("x")),
            Err(FilterError::KindMismatch {
                field: "filed_on".into(),
                expected: FilterKind::DateRange,
            })
        );
        let values = FilterValues::new().with("branch", FilterValue::text("A"));
        assert!(schema.validate(&values).is_ok());
    }

    #[test]
    fn test_set_reports_changes() {
        let mut values = FilterValues::new();
        assert!(values.set("branch", FilterValue::text("A")));
        assert!(!values.set("branch", FilterValue::text("A")));
        assert!(values.remove("branch"));
        assert!(!values.remove("branch"));

        let mut exact = ExactMatchMap::new();
        assert!(!exact.set("branch", true));
        assert!(exact.set("branch", false));
    }
}

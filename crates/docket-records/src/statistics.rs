//! Caseload statistics per branch
//!
//! Both tables use grouped headers:
//!
//! ```text
//! ┌──────┬────────┬───────────────┬─────────────────┐
//! │ Year │ Branch │    Pending    │    Caseload     │
//! │      │        ├───────┬───────┼───────┬─────────┤
//! │      │        │ Start │  End  │ Filed │Disposed │
//! └──────┴────────┴───────┴───────┴───────┴─────────┘
//! ```

use docket_core::{FormData, FromForm, Record, RecordId, RecordSchema, Result, Value};
use docket_forms::{FieldConfig, FieldErrors};
use docket_table::{
    Align, ColumnDef, ColumnEntry, FilterField, FilterSchema, GroupColumnDef, SortConfig,
};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, check_count, text_value};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name of a 1-based month number
pub fn month_name(month: i64) -> Option<&'static str> {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTH_NAMES.get(i).copied())
}

fn count_column<R: Record>(key: &str, label: &str) -> ColumnDef<R> {
    ColumnDef::new(key, label).sortable().align(Align::Right)
}

fn check_year(form: &FormData, errors: &mut FieldErrors) {
    let raw = form.get("year").trim();
    if raw.is_empty() {
        return;
    }
    match raw.parse::<i64>() {
        Ok(year) if (1900..=2999).contains(&year) => {}
        _ => errors.insert("year", "Year must be a four-digit year"),
    }
}

// ============================================================================
// Annual
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualStatistic {
    pub id: RecordId,
    pub year: i64,
    pub branch: String,
    pub pending_start: i64,
    pub pending_end: i64,
    pub filed: i64,
    pub disposed: i64,
}

impl Record for AnnualStatistic {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.clone().into(),
            "year" => self.year.into(),
            "branch" => text_value(&self.branch),
            "pending_start" => self.pending_start.into(),
            "pending_end" => self.pending_end.into(),
            "filed" => self.filed.into(),
            "disposed" => self.disposed.into(),
            _ => Value::Null,
        }
    }

    fn fields(&self) -> Vec<(&str, Value)> {
        Self::FIELDS.iter().map(|name| (*name, self.field(name))).collect()
    }
}

impl RecordSchema for AnnualStatistic {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "year",
        "branch",
        "pending_start",
        "pending_end",
        "filed",
        "disposed",
    ];
}

impl FromForm for AnnualStatistic {
    fn from_form(id: RecordId, form: &FormData) -> Result<Self> {
        Ok(Self {
            id,
            year: form.int("year")?,
            branch: form.required_text("branch")?,
            pending_start: form.int("pending_start")?,
            pending_end: form.int("pending_end")?,
            filed: form.int("filed")?,
            disposed: form.int("disposed")?,
        })
    }
}

impl Entity for AnnualStatistic {
    const TITLE: &'static str = "Annual Statistic";
    const PLURAL: &'static str = "annual_statistics";

    fn columns() -> Vec<ColumnEntry<Self>> {
        vec![
            ColumnDef::new("year", "Year").sortable().into(),
            ColumnDef::new("branch", "Branch").sortable().into(),
            GroupColumnDef::new(
                "Pending",
                vec![count_column("pending_start", "Start"), count_column("pending_end", "End")],
            )
            .into(),
            GroupColumnDef::new(
                "Caseload",
                vec![count_column("filed", "Filed"), count_column("disposed", "Disposed")],
            )
            .into(),
        ]
    }

    fn form_fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::text("year", "Year").required(),
            FieldConfig::text("branch", "Branch").required(),
            FieldConfig::text("pending_start", "Pending at Start of Year").required(),
            FieldConfig::text("pending_end", "Pending at End of Year").required(),
            FieldConfig::text("filed", "Cases Filed").required(),
            FieldConfig::text("disposed", "Cases Disposed").required(),
        ]
    }

    fn filter_schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("year", "Year"),
            FilterField::text("branch", "Branch"),
        ])
    }

    fn default_sort() -> Option<SortConfig> {
        Some(SortConfig::descending("year"))
    }

    fn validate_form(form: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_year(form, &mut errors);
        check_count(form, "pending_start", "Pending at Start of Year", &mut errors);
        check_count(form, "pending_end", "Pending at End of Year", &mut errors);
        check_count(form, "filed", "Cases Filed", &mut errors);
        check_count(form, "disposed", "Cases Disposed", &mut errors);
        errors
    }
}

// ============================================================================
// Monthly
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStatistic {
    pub id: RecordId,
    pub year: i64,
    /// 1-based month number
    pub month: i64,
    pub branch: String,
    pub filed_civil: i64,
    pub filed_criminal: i64,
    pub disposed_civil: i64,
    pub disposed_criminal: i64,
}

impl Record for MonthlyStatistic {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.clone().into(),
            "year" => self.year.into(),
            "month" => self.month.into(),
            "branch" => text_value(&self.branch),
            "filed_civil" => self.filed_civil.into(),
            "filed_criminal" => self.filed_criminal.into(),
            "disposed_civil" => self.disposed_civil.into(),
            "disposed_criminal" => self.disposed_criminal.into(),
            _ => Value::Null,
        }
    }

    fn fields(&self) -> Vec<(&str, Value)> {
        Self::FIELDS.iter().map(|name| (*name, self.field(name))).collect()
    }
}

impl RecordSchema for MonthlyStatistic {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "year",
        "month",
        "branch",
        "filed_civil",
        "filed_criminal",
        "disposed_civil",
        "disposed_criminal",
    ];
}

impl FromForm for MonthlyStatistic {
    fn from_form(id: RecordId, form: &FormData) -> Result<Self> {
        Ok(Self {
            id,
            year: form.int("year")?,
            month: form.int("month")?,
            branch: form.required_text("branch")?,
            filed_civil: form.int("filed_civil")?,
            filed_criminal: form.int("filed_criminal")?,
            disposed_civil: form.int("disposed_civil")?,
            disposed_criminal: form.int("disposed_criminal")?,
        })
    }
}

impl Entity for MonthlyStatistic {
    const TITLE: &'static str = "Monthly Statistic";
    const PLURAL: &'static str = "monthly_statistics";

    fn columns() -> Vec<ColumnEntry<Self>> {
        vec![
            ColumnDef::new("year", "Year").sortable().into(),
            ColumnDef::new("month", "Month")
                .sortable()
                .render_with(|s: &MonthlyStatistic| {
                    month_name(s.month)
                        .map(str::to_string)
                        .unwrap_or_else(|| s.month.to_string())
                })
                .into(),
            ColumnDef::new("branch", "Branch").sortable().into(),
            GroupColumnDef::new(
                "Filed",
                vec![count_column("filed_civil", "Civil"), count_column("filed_criminal", "Criminal")],
            )
            .into(),
            GroupColumnDef::new(
                "Disposed",
                vec![
                    count_column("disposed_civil", "Civil"),
                    count_column("disposed_criminal", "Criminal"),
                ],
            )
            .into(),
        ]
    }

    fn form_fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::text("year", "Year").required(),
            FieldConfig::text("month", "Month").required().with_placeholder("1-12"),
            FieldConfig::text("branch", "Branch").required(),
            FieldConfig::text("filed_civil", "Civil Cases Filed").required(),
            FieldConfig::text("filed_criminal", "Criminal Cases Filed").required(),
            FieldConfig::text("disposed_civil", "Civil Cases Disposed").required(),
            FieldConfig::text("disposed_criminal", "Criminal Cases Disposed").required(),
        ]
    }

    fn filter_schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("year", "Year"),
            FilterField::text("month", "Month"),
            FilterField::text("branch", "Branch"),
        ])
    }

    fn default_sort() -> Option<SortConfig> {
        Some(SortConfig::descending("year"))
    }

    fn validate_form(form: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_year(form, &mut errors);
        let month = form.get("month").trim();
        if !month.is_empty() && month.parse::<i64>().ok().and_then(month_name).is_none() {
            errors.insert("month", "Month must be between 1 and 12");
        }
        check_count(form, "filed_civil", "Civil Cases Filed", &mut errors);
        check_count(form, "filed_criminal", "Criminal Cases Filed", &mut errors);
        check_count(form, "disposed_civil", "Civil Cases Disposed", &mut errors);
        check_count(form, "disposed_criminal", "Criminal Cases Disposed", &mut errors);
        errors
    }
}

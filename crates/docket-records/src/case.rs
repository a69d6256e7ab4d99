//! Court cases

use chrono::NaiveDate;
use docket_core::{FormData, FromForm, Record, RecordId, RecordSchema, Result, Value};
use docket_forms::FieldConfig;
use docket_table::{Align, ColumnDef, ColumnEntry, FilterField, FilterSchema, SortConfig};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, text_value};

pub const CASE_TYPES: &[&str] = &["Civil", "Criminal", "Special Proceedings", "Land Registration"];

pub const CASE_STATUSES: &[&str] = &["Pending", "Decided", "Dismissed", "Archived"];

/// A case on a branch's docket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: RecordId,
    pub case_number: String,
    pub branch: String,
    pub case_type: String,
    pub title: String,
    #[serde(default)]
    pub filed_on: Option<NaiveDate>,
    pub status: String,
    #[serde(default)]
    pub judge: String,
    #[serde(default)]
    pub remarks: String,
}

impl Record for Case {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.clone().into(),
            "case_number" => text_value(&self.case_number),
            "branch" => text_value(&self.branch),
            "case_type" => text_value(&self.case_type),
            "title" => text_value(&self.title),
            "filed_on" => self.filed_on.into(),
            "status" => text_value(&self.status),
            "judge" => text_value(&self.judge),
            "remarks" => text_value(&self.remarks),
            _ => Value::Null,
        }
    }

    fn fields(&self) -> Vec<(&str, Value)> {
        Self::FIELDS.iter().map(|name| (*name, self.field(name))).collect()
    }
}

impl RecordSchema for Case {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "case_number",
        "branch",
        "case_type",
        "title",
        "filed_on",
        "status",
        "judge",
        "remarks",
    ];
}

impl FromForm for Case {
    fn from_form(id: RecordId, form: &FormData) -> Result<Self> {
        Ok(Self {
            id,
            case_number: form.required_text("case_number")?,
            branch: form.required_text("branch")?,
            case_type: form.required_text("case_type")?,
            title: form.required_text("title")?,
            filed_on: form.date("filed_on")?,
            status: form.text("status").unwrap_or_else(|| "Pending".to_string()),
            judge: form.text("judge").unwrap_or_default(),
            remarks: form.text("remarks").unwrap_or_default(),
        })
    }
}

impl Entity for Case {
    const TITLE: &'static str = "Case";
    const PLURAL: &'static str = "cases";

    fn columns() -> Vec<ColumnEntry<Self>> {
        vec![
            ColumnDef::new("case_number", "Case No.").sortable().into(),
            ColumnDef::new("title", "Title").sortable().into(),
            ColumnDef::new("case_type", "Type").into(),
            ColumnDef::new("branch", "Branch").sortable().into(),
            ColumnDef::new("filed_on", "Filed On")
                .sortable()
                .align(Align::Center)
                .into(),
            ColumnDef::new("status", "Status").align(Align::Center).into(),
            ColumnDef::new("judge", "Judge").into(),
        ]
    }

    fn form_fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::text("case_number", "Case No.")
                .required()
                .with_placeholder("e.g. CV-2024-0113"),
            FieldConfig::text("title", "Title").required(),
            FieldConfig::select("case_type", "Type", CASE_TYPES.iter().copied()).required(),
            FieldConfig::text("branch", "Branch").required(),
            FieldConfig::date("filed_on", "Filed On").required(),
            FieldConfig::select("status", "Status", CASE_STATUSES.iter().copied()).required(),
            FieldConfig::text("judge", "Presiding Judge"),
            FieldConfig::textarea("remarks", "Remarks"),
        ]
    }

    fn filter_schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("branch", "Branch"),
            FilterField::text("case_type", "Type"),
            FilterField::text("status", "Status"),
            FilterField::date_range("filed_on", "Filed On"),
        ])
    }

    fn default_sort() -> Option<SortConfig> {
        Some(SortConfig::descending("filed_on"))
    }

    fn unique_field() -> Option<&'static str> {
        Some("case_number")
    }
}

//! Receiving-section log of incoming documents

use chrono::{NaiveDate, NaiveTime};
use docket_core::{FormData, FromForm, Record, RecordId, RecordSchema, Result, Value};
use docket_forms::FieldConfig;
use docket_table::{Align, ColumnDef, ColumnEntry, FilterField, FilterSchema, SortConfig};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, text_value};

pub const DOCUMENT_TYPES: &[&str] = &[
    "Complaint",
    "Information",
    "Petition",
    "Motion",
    "Pleading",
    "Order",
    "Notice",
    "Subpoena",
    "Other",
];

/// One document received over the counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveLog {
    pub id: RecordId,
    #[serde(default)]
    pub received_on: Option<NaiveDate>,
    #[serde(default)]
    pub received_at: Option<NaiveTime>,
    pub document_type: String,
    #[serde(default)]
    pub case_number: String,
    pub branch: String,
    pub received_by: String,
    #[serde(default)]
    pub remarks: String,
}

impl Record for ReceiveLog {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.clone().into(),
            "received_on" => self.received_on.into(),
            "received_at" => self.received_at.into(),
            "document_type" => text_value(&self.document_type),
            "case_number" => text_value(&self.case_number),
            "branch" => text_value(&self.branch),
            "received_by" => text_value(&self.received_by),
            "remarks" => text_value(&self.remarks),
            _ => Value::Null,
        }
    }

    fn fields(&self) -> Vec<(&str, Value)> {
        Self::FIELDS.iter().map(|name| (*name, self.field(name))).collect()
    }
}

impl RecordSchema for ReceiveLog {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "received_on",
        "received_at",
        "document_type",
        "case_number",
        "branch",
        "received_by",
        "remarks",
    ];
}

impl FromForm for ReceiveLog {
    fn from_form(id: RecordId, form: &FormData) -> Result<Self> {
        Ok(Self {
            id,
            received_on: form.date("received_on")?,
            received_at: form.time("received_at")?,
            document_type: form.required_text("document_type")?,
            case_number: form.text("case_number").unwrap_or_default(),
            branch: form.required_text("branch")?,
            received_by: form.required_text("received_by")?,
            remarks: form.text("remarks").unwrap_or_default(),
        })
    }
}

impl Entity for ReceiveLog {
    const TITLE: &'static str = "Receive Log";
    const PLURAL: &'static str = "receive_logs";

    fn columns() -> Vec<ColumnEntry<Self>> {
        vec![
            ColumnDef::new("received_on", "Date").sortable().align(Align::Center).into(),
            ColumnDef::new("received_at", "Time").align(Align::Center).into(),
            ColumnDef::new("document_type", "Document").sortable().into(),
            ColumnDef::new("case_number", "Case No.").sortable().into(),
            ColumnDef::new("branch", "Branch").sortable().into(),
            ColumnDef::new("received_by", "Received By").into(),
            ColumnDef::new("remarks", "Remarks").into(),
        ]
    }

    fn form_fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::date("received_on", "Date Received").required(),
            FieldConfig::time("received_at", "Time Received").required(),
            FieldConfig::select("document_type", "Document Type", DOCUMENT_TYPES.iter().copied())
                .required(),
            FieldConfig::text("case_number", "Case No.").with_placeholder("Leave blank for new filings"),
            FieldConfig::text("branch", "Branch").required(),
            FieldConfig::text("received_by", "Received By").required(),
            FieldConfig::textarea("remarks", "Remarks"),
        ]
    }

    fn filter_schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("document_type", "Document"),
            FilterField::text("branch", "Branch"),
            FilterField::text("received_by", "Received By"),
            FilterField::date_range("received_on", "Date Received"),
        ])
    }

    fn default_sort() -> Option<SortConfig> {
        Some(SortConfig::descending("received_on"))
    }
}

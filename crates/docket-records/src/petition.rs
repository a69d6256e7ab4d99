//! Petitions and their hearing schedule

use chrono::{NaiveDate, NaiveTime};
use docket_core::{FormData, FromForm, Record, RecordId, RecordSchema, Result, Value, parse_date};
use docket_forms::{FieldConfig, FieldErrors};
use docket_table::{Align, ColumnDef, ColumnEntry, FilterField, FilterSchema, SortConfig};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, text_value};

pub const PETITION_STATUSES: &[&str] = &["Filed", "Set for Hearing", "Granted", "Denied", "Withdrawn"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petition {
    pub id: RecordId,
    pub petition_number: String,
    pub petitioner: String,
    pub branch: String,
    pub nature: String,
    #[serde(default)]
    pub filed_on: Option<NaiveDate>,
    #[serde(default)]
    pub hearing_date: Option<NaiveDate>,
    #[serde(default, with = "hearing_time_format")]
    pub hearing_time: Option<NaiveTime>,
    pub status: String,
}

/// Hearing times are stored as `HH:MM`
mod hearing_time_format {
    use chrono::NaiveTime;
    use docket_core::{TIME_FORMAT, parse_time};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format(TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => parse_time(raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid hearing time '{}'", raw))),
        }
    }
}

impl Record for Petition {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.clone().into(),
            "petition_number" => text_value(&self.petition_number),
            "petitioner" => text_value(&self.petitioner),
            "branch" => text_value(&self.branch),
            "nature" => text_value(&self.nature),
            "filed_on" => self.filed_on.into(),
            "hearing_date" => self.hearing_date.into(),
            "hearing_time" => self.hearing_time.into(),
            "status" => text_value(&self.status),
            _ => Value::Null,
        }
    }

    fn fields(&self) -> Vec<(&str, Value)> {
        Self::FIELDS.iter().map(|name| (*name, self.field(name))).collect()
    }
}

impl RecordSchema for Petition {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "petition_number",
        "petitioner",
        "branch",
        "nature",
        "filed_on",
        "hearing_date",
        "hearing_time",
        "status",
    ];
}

impl FromForm for Petition {
    fn from_form(id: RecordId, form: &FormData) -> Result<Self> {
        Ok(Self {
            id,
            petition_number: form.required_text("petition_number")?,
            petitioner: form.required_text("petitioner")?,
            branch: form.required_text("branch")?,
            nature: form.required_text("nature")?,
            filed_on: form.date("filed_on")?,
            hearing_date: form.date("hearing_date")?,
            hearing_time: form.time("hearing_time")?,
            status: form.text("status").unwrap_or_else(|| "Filed".to_string()),
        })
    }
}

impl Entity for Petition {
    const TITLE: &'static str = "Petition";
    const PLURAL: &'static str = "petitions";

    fn columns() -> Vec<ColumnEntry<Self>> {
        vec![
            ColumnDef::new("petition_number", "Petition No.").sortable().into(),
            ColumnDef::new("petitioner", "Petitioner").sortable().into(),
            ColumnDef::new("nature", "Nature").into(),
            ColumnDef::new("branch", "Branch").sortable().into(),
            ColumnDef::new("filed_on", "Filed On").sortable().align(Align::Center).into(),
            ColumnDef::new("hearing_date", "Hearing")
                .sortable()
                .align(Align::Center)
                .render_with(|p: &Petition| match (p.hearing_date, p.hearing_time) {
                    (Some(date), Some(time)) => format!("{} {}", date.format("%Y-%m-%d"), time.format("%H:%M")),
                    (Some(date), None) => date.format("%Y-%m-%d").to_string(),
                    (None, _) => String::new(),
                })
                .into(),
            ColumnDef::new("status", "Status").align(Align::Center).into(),
        ]
    }

    fn form_fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::text("petition_number", "Petition No.").required(),
            FieldConfig::text("petitioner", "Petitioner").required(),
            FieldConfig::text("nature", "Nature of Petition").required(),
            FieldConfig::text("branch", "Branch").required(),
            FieldConfig::date("filed_on", "Filed On").required(),
            FieldConfig::date("hearing_date", "Hearing Date"),
            FieldConfig::time("hearing_time", "Hearing Time").with_placeholder("HH:MM"),
            FieldConfig::select("status", "Status", PETITION_STATUSES.iter().copied()).required(),
        ]
    }

    fn filter_schema() -> FilterSchema {
        FilterSchema::new(vec![
            FilterField::text("branch", "Branch"),
            FilterField::text("status", "Status"),
            FilterField::date_range("filed_on", "Filed On"),
            FilterField::date_range("hearing_date", "Hearing Date"),
        ])
    }

    fn default_sort() -> Option<SortConfig> {
        Some(SortConfig::ascending("hearing_date"))
    }

    fn unique_field() -> Option<&'static str> {
        Some("petition_number")
    }

    /// A hearing cannot be set before the petition was filed, and a
    /// hearing time needs a hearing date
    fn validate_form(form: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let filed = parse_date(form.get("filed_on"));
        let hearing = parse_date(form.get("hearing_date"));
        if matches!((filed, hearing), (Some(filed), Some(hearing)) if hearing < filed) {
            errors.insert("hearing_date", "Hearing Date cannot be before the filing date");
        }
        if !form.get("hearing_time").trim().is_empty() && form.get("hearing_date").trim().is_empty() {
            errors.insert("hearing_date", "Hearing Date is required when a time is set");
        }
        errors
    }
}

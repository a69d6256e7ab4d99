//! Record identity and field access

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{FormData, Result, Value};

/// Primary key of a record within its owning collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric key (the common case for database-backed rows)
    Int(i64),
    /// Textual key
    Text(String),
}

impl RecordId {
    /// Placeholder id for records that have not been persisted yet
    pub const UNASSIGNED: RecordId = RecordId::Int(0);

    /// Get the numeric key, if this id is numeric
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordId::Int(v) => Some(*v),
            RecordId::Text(_) => None,
        }
    }

    /// Whether this id is the unassigned placeholder (or an empty text key)
    pub fn is_unassigned(&self) -> bool {
        match self {
            RecordId::Int(v) => *v <= 0,
            RecordId::Text(s) => s.is_empty(),
        }
    }

    /// Parse an id from user input, preferring the numeric form
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        input
            .parse::<i64>()
            .map(RecordId::Int)
            .unwrap_or_else(|_| RecordId::Text(input.to_string()))
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Int(v) => write!(f, "{}", v),
            RecordId::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<RecordId> for Value {
    fn from(value: RecordId) -> Self {
        match value {
            RecordId::Int(v) => Value::Int64(v),
            RecordId::Text(v) => Value::String(v),
        }
    }
}

/// A row of domain data with a stable identity.
///
/// Records are treated as immutable values: a mutation is represented by
/// replacing the record in its owning collection.
pub trait Record: Clone + Send + Sync + 'static {
    /// Primary key of this record
    fn id(&self) -> RecordId;

    /// Replace the primary key (used when a collection assigns a fresh id)
    fn set_id(&mut self, id: RecordId);

    /// Look up a field by name. Unknown or missing fields yield `Value::Null`.
    fn field(&self, name: &str) -> Value;

    /// All fields of this record in display order, including `id`
    fn fields(&self) -> Vec<(&str, Value)>;
}

/// Static field list for typed records
pub trait RecordSchema {
    /// Every field name a column or filter may refer to
    const FIELDS: &'static [&'static str];
}

/// Construction of a record from a submitted form payload
pub trait FromForm: Record + Sized {
    /// Build a record with the given id from form data
    fn from_form(id: RecordId, form: &FormData) -> Result<Self>;
}

/// An untyped record: an ordered mapping from field name to value.
///
/// # Examples
///
/// ```
/// use docket_core::{DynamicRecord, Record, RecordId, Value};
///
/// let record = DynamicRecord::new(1).with("branch", "A");
/// assert_eq!(record.id(), RecordId::Int(1));
/// assert_eq!(record.field("branch"), Value::from("A"));
/// assert!(record.field("missing").is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicRecord {
    id: RecordId,
    #[serde(flatten)]
    values: IndexMap<String, Value>,
}

impl DynamicRecord {
    /// Create an empty record with the given id
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            values: IndexMap::new(),
        }
    }

    /// Add or replace a field value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field value in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        if name == "id" {
            return;
        }
        self.values.insert(name, value.into());
    }

    /// Names of the non-id fields in insertion order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl Record for DynamicRecord {
    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn field(&self, name: &str) -> Value {
        if name == "id" {
            return self.id.clone().into();
        }
        self.values.get(name).cloned().unwrap_or_default()
    }

    fn fields(&self) -> Vec<(&str, Value)> {
        let mut fields = Vec::with_capacity(self.values.len() + 1);
        fields.push(("id", self.id.clone().into()));
        fields.extend(self.values.iter().map(|(k, v)| (k.as_str(), v.clone())));
        fields
    }
}

impl FromForm for DynamicRecord {
    fn from_form(id: RecordId, form: &FormData) -> Result<Self> {
        let mut record = DynamicRecord::new(id);
        for (name, value) in form.iter() {
            record.set(name, value);
        }
        Ok(record)
    }
}

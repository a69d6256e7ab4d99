//! Single-key record sorting
//!
//! Provides the record comparator and the sort toggle state used by
//! sortable column headers.

use std::cmp::Ordering;

use docket_core::{Record, Value};
use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// The opposite direction
    pub fn flipped(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The active sort key and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    pub order: SortOrder,
}

impl SortConfig {
    pub fn new(key: impl Into<String>, order: SortOrder) -> Self {
        Self {
            key: key.into(),
            order,
        }
    }

    pub fn ascending(key: impl Into<String>) -> Self {
        Self::new(key, SortOrder::Ascending)
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self::new(key, SortOrder::Descending)
    }
}

/// Header-click sort state: at most one key is active at a time.
///
/// Toggling the active key flips its order; selecting a different key
/// starts over at the default order.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    active: Option<SortConfig>,
    default_order: SortOrder,
}

impl SortState {
    pub fn new(default_order: SortOrder) -> Self {
        Self {
            active: None,
            default_order,
        }
    }

    /// Start with a sort already applied
    pub fn with_initial(mut self, config: SortConfig) -> Self {
        self.active = Some(config);
        self
    }

    pub fn active(&self) -> Option<&SortConfig> {
        self.active.as_ref()
    }

    pub fn default_order(&self) -> SortOrder {
        self.default_order
    }

    /// Change the order used for newly selected keys; the active sort is kept
    pub fn set_default_order(&mut self, order: SortOrder) {
        self.default_order = order;
    }

    /// Toggle the sort on `key` and return the resulting configuration
    pub fn toggle(&mut self, key: &str) -> &SortConfig {
        let next = match self.active.take() {
            Some(current) if current.key == key => {
                SortConfig::new(current.key, current.order.flipped())
            }
            _ => SortConfig::new(key, self.default_order),
        };
        tracing::trace!(key = %next.key, order = next.order.label(), "sort toggled");
        self.active.insert(next)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Compare two records by `key`.
///
/// A record whose value is null sorts after every defined value under
/// both directions; only defined values are affected by `order`.
pub fn compare_records<R: Record>(a: &R, b: &R, key: &str, order: SortOrder) -> Ordering {
    let va = a.field(key);
    let vb = b.field(key);

    match (va.is_null(), vb.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = compare_values(&va, &vb);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        }
    }
}

/// Stable sort of record references by the given configuration
pub fn sort_records<R: Record>(records: &mut [&R], config: &SortConfig) {
    records.sort_by(|a, b| compare_records(*a, *b, &config.key, config.order));
}

/// Compare two non-null values.
///
/// This is a total order. Floats use `f64::total_cmp` so NaN sorts after
/// every number. Integers and floats compare by exact numeric value.
/// Values of unrelated kinds in the same field are grouped by kind.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
        (Value::Float64(a), Value::Float64(b)) => a.total_cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),

        // Date/Time comparisons
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::Time(a), Value::Time(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (Value::Date(a), Value::DateTime(b)) => a.cmp(&b.date()).then(Ordering::Less),
        (Value::DateTime(a), Value::Date(b)) => a.date().cmp(b).then(Ordering::Greater),

        // Cross-type numeric comparison
        (Value::Int64(a), Value::Float64(b)) => compare_int_float(*a, *b),
        (Value::Float64(a), Value::Int64(b)) => compare_int_float(*b, *a).reverse(),

        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn compare_int_float(int: i64, float: f64) -> Ordering {
    match (int as f64).total_cmp(&float) {
        // Equal after rounding: `float` is integral and in i64 range
        Ordering::Equal => i128::from(int).cmp(&(float as i128)),
        unequal => unequal,
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Int64(_) | Value::Float64(_) => 1,
        Value::Date(_) | Value::DateTime(_) => 2,
        Value::Time(_) => 3,
        Value::String(_) => 4,
        Value::Null => 5,
    }
}

//! Court record types
//!
//! Each record type implements [`Entity`], which ties together the record's
//! fields, its table columns, its drawer form and its filters:
//!
//! ```text
//! ┌──────────────┐   columns()      ┌─────────────┐
//! │              │ ───────────────▶ │ RecordTable │
//! │    Entity    │   form_fields()  ├─────────────┤
//! │  (Case, ...) │ ───────────────▶ │   Drawer    │
//! │              │   filter_schema  ├─────────────┤
//! └──────────────┘ ───────────────▶ │   Filters   │
//!                                   └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use docket_records::{Case, Entity};
//!
//! let table = Case::table(25).unwrap();
//! assert_eq!(table.leaf_columns().len(), 7);
//! ```

mod case;
mod entity;
mod petition;
mod receive_log;
mod statistics;

pub use case::{CASE_STATUSES, CASE_TYPES, Case};
pub use entity::{ConfigError, Entity, EntityKind};
pub use petition::{PETITION_STATUSES, Petition};
pub use receive_log::{DOCUMENT_TYPES, ReceiveLog};
pub use statistics::{AnnualStatistic, MonthlyStatistic, month_name};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_parsing() {
        assert_eq!("receive-log".parse::<EntityKind>(), Ok(EntityKind::ReceiveLog));
        assert_eq!(" Case ".parse::<EntityKind>(), Ok(EntityKind::Case));
        assert!("docket".parse::<EntityKind>().is_err());
        for kind in EntityKind::all() {
            assert_eq!(kind.name().parse::<EntityKind>().as_ref(), Ok(kind));
        }
    }

    #[test]
    fn test_every_entity_configures() {
        assert!(Case::table(10).is_ok() && Case::drawer().is_ok());
        assert!(Petition::table(10).is_ok() && Petition::drawer().is_ok());
        assert!(ReceiveLog::table(10).is_ok() && ReceiveLog::drawer().is_ok());
        assert!(AnnualStatistic::table(10).is_ok() && AnnualStatistic::drawer().is_ok());
        assert!(MonthlyStatistic::table(10).is_ok() && MonthlyStatistic::drawer().is_ok());
    }
}

//! Docket Table - Client-side record table engine
//!
//! Every table view derives its visible rows the same way:
//!
//! ```text
//! records ─▶ filter ─▶ search ─▶ sort ─▶ paginate ─▶ page
//! ```
//!
//! - [`filter`] - Per-field exact/substring and date-range constraints
//! - [`search`] - Free-text search across all field values
//! - [`sort`] - Single-key comparator with nulls always last
//! - [`pagination`] - Fixed page-size windowing
//! - [`columns`] - Column and grouped-header configuration
//! - [`Collection`] - The owned, insertion-ordered record array
//! - [`RecordTable`] - Controller holding the query state of one table

mod collection;
pub mod columns;
mod controller;
pub mod filter;
pub mod pagination;
pub mod search;
pub mod sort;

pub use collection::Collection;
pub use columns::{Align, ColumnDef, ColumnEntry, ColumnError, GroupColumnDef, HeaderCell};
pub use controller::{RecordTable, RowAction, TableError, TableView};
pub use filter::{
    ExactMatchMap, FilterError, FilterField, FilterKind, FilterSchema, FilterValue, FilterValues,
};
pub use pagination::{Pagination, DEFAULT_PAGE_SIZE};
pub use sort::{SortConfig, SortOrder, SortState};

//! Table controller: query state plus the derived page of rows

use docket_core::{Actor, Permission, Record};
use thiserror::Error;

use crate::collection::Collection;
use crate::columns::{self, ColumnDef, ColumnEntry, ColumnError, HeaderCell};
use crate::filter::{self, ExactMatchMap, FilterError, FilterSchema, FilterValue, FilterValues};
use crate::pagination::{self, Pagination};
use crate::search;
use crate::sort::{self, SortConfig, SortOrder, SortState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error("no column with key '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is not sortable")]
    NotSortable(String),
}

/// Per-row actions offered to the current actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }

    pub fn permission(&self) -> Permission {
        match self {
            Self::Edit => Permission::Edit,
            Self::Delete => Permission::Delete,
        }
    }
}

/// One derived page of the table
#[derive(Debug, Clone)]
pub struct TableView<'a, R> {
    pub rows: Vec<&'a R>,
    /// Rows after filtering and searching, before pagination
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

impl<R> TableView<'_, R> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Query state for one record table.
///
/// The visible page is always derived from the collection as
/// `paginate(sort(search(filter(records))))`; nothing here caches rows.
#[derive(Debug, Clone)]
pub struct RecordTable<R> {
    columns: Vec<ColumnEntry<R>>,
    filter_schema: FilterSchema,
    search_term: String,
    filters: FilterValues,
    exact: ExactMatchMap,
    sort: SortState,
    pagination: Pagination,
}

impl<R: Record> RecordTable<R> {
    pub fn new(columns: Vec<ColumnEntry<R>>) -> Self {
        Self {
            columns,
            filter_schema: FilterSchema::default(),
            search_term: String::new(),
            filters: FilterValues::new(),
            exact: ExactMatchMap::new(),
            sort: SortState::default(),
            pagination: Pagination::default(),
        }
    }

    /// Build a table whose column keys are checked against `fields`
    pub fn checked(columns: Vec<ColumnEntry<R>>, fields: &[&str]) -> Result<Self, TableError> {
        columns::validate_keys(&columns, fields)?;
        Ok(Self::new(columns))
    }

    pub fn with_filter_schema(mut self, schema: FilterSchema) -> Self {
        self.filter_schema = schema;
        self
    }

    /// Order applied when a new column is sorted
    pub fn with_default_order(mut self, order: SortOrder) -> Self {
        self.sort.set_default_order(order);
        self
    }

    pub fn with_initial_sort(mut self, config: SortConfig) -> Self {
        self.sort = self.sort.with_initial(config);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pagination = Pagination::new(page_size);
        self
    }

    pub fn columns(&self) -> &[ColumnEntry<R>] {
        &self.columns
    }

    pub fn leaf_columns(&self) -> Vec<&ColumnDef<R>> {
        columns::flatten(&self.columns)
    }

    pub fn header_rows(&self) -> Vec<Vec<HeaderCell>> {
        columns::header_rows(&self.columns)
    }

    pub fn filter_schema(&self) -> &FilterSchema {
        &self.filter_schema
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filters(&self) -> &FilterValues {
        &self.filters
    }

    pub fn exact_match(&self) -> &ExactMatchMap {
        &self.exact
    }

    pub fn sort(&self) -> Option<&SortConfig> {
        self.sort.active()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Set the free-text search term; a changed term returns to page 1
    pub fn set_search(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();
        if term == self.search_term {
            return false;
        }
        self.search_term = term;
        self.pagination.reset();
        true
    }

    /// Set one field constraint; a changed constraint returns to page 1
    pub fn set_filter(&mut self, field: &str, value: FilterValue) -> Result<bool, TableError> {
        self.filter_schema.check(field, &value)?;
        let changed = self.filters.set(field, value);
        if changed {
            self.pagination.reset();
        }
        Ok(changed)
    }

    pub fn clear_filter(&mut self, field: &str) -> bool {
        let changed = self.filters.remove(field);
        if changed {
            self.pagination.reset();
        }
        changed
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.pagination.reset();
        }
    }

    /// Switch a text filter between full-value and substring matching
    pub fn set_exact_match(&mut self, field: &str, exact: bool) -> bool {
        let changed = self.exact.set(field, exact);
        if changed && self.filters.get(field).is_some() {
            self.pagination.reset();
        }
        changed
    }

    /// Toggle the sort on a sortable leaf column
    pub fn toggle_sort(&mut self, key: &str) -> Result<&SortConfig, TableError> {
        let column = self
            .leaf_columns()
            .into_iter()
            .find(|column| column.key == key)
            .map(|column| column.sortable);
        match column {
            None => Err(TableError::UnknownColumn(key.to_string())),
            Some(false) => Err(TableError::NotSortable(key.to_string())),
            Some(true) => Ok(self.sort.toggle(key)),
        }
    }

    /// Request a page; the next [`RecordTable::view`] clamps it into range
    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pagination.go_to_page(page)
    }

    pub fn next_page(&mut self) -> bool {
        let next = self.pagination.current_page.saturating_add(1);
        self.pagination.go_to_page(next)
    }

    pub fn prev_page(&mut self) -> bool {
        self.pagination.go_prev()
    }

    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        self.pagination.set_page_size(page_size)
    }

    /// Filtered, searched and sorted rows, before pagination
    pub fn derive<'a>(&self, collection: &'a Collection<R>) -> Vec<&'a R> {
        let records = collection.refs();
        let filtered = filter::apply(&records, &self.filters, &self.exact);
        let mut rows = search::search(&filtered, &self.search_term);
        if let Some(config) = self.sort.active() {
            sort::sort_records(&mut rows, config);
        }
        rows
    }

    /// Derive the current page, clamping the page number into range
    pub fn view<'a>(&mut self, collection: &'a Collection<R>) -> TableView<'a, R> {
        let rows = self.derive(collection);
        self.pagination.clamp(rows.len());

        let page = self.pagination.current_page;
        let page_rows = pagination::paginate(&rows, self.pagination.page_size, page).to_vec();
        tracing::debug!(
            records = collection.len(),
            matched = rows.len(),
            page,
            shown = page_rows.len(),
            "derived table view"
        );

        TableView {
            rows: page_rows,
            total: rows.len(),
            page,
            page_count: self.pagination.total_pages(),
        }
    }

    /// Cell text for every leaf column of `record`
    pub fn render_row(&self, record: &R) -> Vec<String> {
        self.leaf_columns()
            .into_iter()
            .map(|column| column.render(record))
            .collect()
    }

    /// Row actions the actor is allowed to use
    pub fn row_actions(&self, actor: &Actor) -> Vec<RowAction> {
        [RowAction::Edit, RowAction::Delete]
            .into_iter()
            .filter(|action| actor.can(action.permission()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterField;
    use chrono::NaiveDate;
    use docket_core::{DynamicRecord, PermissionSet, RecordId};
    use pretty_assertions::assert_eq;

    fn collection(n: i64) -> Collection<DynamicRecord> {
        (1..=n)
            .map(|i| {
                DynamicRecord::new(i)
                    .with("branch", if i % 2 == 0 { "RTC 1" } else { "RTC 2" })
                    .with("filed_on", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64))
            })
            .collect()
    }

    fn table() -> RecordTable<DynamicRecord> {
        RecordTable::new(vec![
            ColumnDef::new("id", "ID").sortable().into(),
            ColumnDef::new("branch", "Branch").sortable().into(),
            ColumnDef::new("filed_on", "Filed On").into(),
        ])
        .with_filter_schema(FilterSchema::new(vec![
            FilterField::text("branch", "Branch"),
            FilterField::date_range("filed_on", "Filed On"),
        ]))
        .with_page_size(25)
    }

    #[test]
    fn test_view_paginates_52_records() {
        let records = collection(52);
        let mut table = table();

        let view = table.view(&records);
        assert_eq!((view.total, view.page, view.page_count), (52, 1, 3));
        assert_eq!(view.rows.len(), 25);

        table.go_to_page(3);
        let view = table.view(&records);
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn test_go_to_page_before_first_view() {
        let records = collection(52);
        let mut table = table();

        table.go_to_page(2);
        let view = table.view(&records);
        assert_eq!(view.page, 2);
        assert_eq!(view.rows.first().map(|r| r.id()), Some(RecordId::Int(26)));
    }

    #[test]
    fn test_next_page_after_filter_widens() {
        let records = collection(52);
        let mut table = table();
        let start = NaiveDate::from_ymd_opt(2024, 1, 2);
        table.set_filter("filed_on", FilterValue::range(start, start)).unwrap();
        assert_eq!(table.view(&records).page_count, 1);

        table.clear_filters();
        table.next_page();
        let view = table.view(&records);
        assert_eq!((view.page, view.total), (2, 52));

        table.go_to_page(9);
        assert_eq!(table.view(&records).page, 3);
    }

    #[test]
    fn test_changing_search_resets_page() {
        let records = collection(52);
        let mut table = table();
        table.view(&records);
        table.go_to_page(3);

        assert!(table.set_search("rtc 1"));
        assert_eq!(table.pagination().current_page, 1);
        assert!(!table.set_search("rtc 1"));

        let view = table.view(&records);
        assert_eq!(view.total, 26);
    }

    #[test]
    fn test_changing_filter_resets_page() {
        let records = collection(52);
        let mut table = table();
        table.view(&records);
        table.go_to_page(2);

        let changed = table.set_filter("branch", FilterValue::text("RTC 2")).unwrap();
        assert!(changed);
        assert_eq!(table.pagination().current_page, 1);
    }

    #[test]
    fn test_filter_outside_schema_is_rejected() {
        let mut table = table();
        let err = table.set_filter("judge", FilterValue::text("x")).unwrap_err();
        assert_eq!(err, TableError::Filter(FilterError::UnknownField("judge".into())));

        let err = table.set_filter("branch", FilterValue::range(None, None)).unwrap_err();
        assert!(matches!(err, TableError::Filter(FilterError::KindMismatch { .. })));
    }

    #[test]
    fn test_shrinking_result_clamps_page() {
        let records = collection(52);
        let mut table = table();
        table.view(&records);
        table.go_to_page(3);

        let fewer = collection(30);
        let view = table.view(&fewer);
        assert_eq!(view.page, 2);
        assert_eq!(view.rows.len(), 5);
    }

    #[test]
    fn test_toggle_sort_checks_columns() {
        let records = collection(5);
        let mut table = table();

        assert_eq!(
            table.toggle_sort("filed_on").unwrap_err(),
            TableError::NotSortable("filed_on".into())
        );
        assert_eq!(
            table.toggle_sort("judge").unwrap_err(),
            TableError::UnknownColumn("judge".into())
        );

        table.toggle_sort("id").unwrap();
        table.toggle_sort("id").unwrap();
        let view = table.view(&records);
        let ids: Vec<RecordId> = view.rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, (1..=5).rev().map(RecordId::Int).collect::<Vec<_>>());
    }

    #[test]
    fn test_default_order_keeps_initial_sort() {
        let mut table = table()
            .with_initial_sort(SortConfig::ascending("branch"))
            .with_default_order(SortOrder::Descending);
        assert_eq!(table.sort(), Some(&SortConfig::ascending("branch")));

        let config = table.toggle_sort("id").unwrap();
        assert_eq!(config.order, SortOrder::Descending);
    }

    #[test]
    fn test_date_range_filter_through_table() {
        let records = collection(10);
        let mut table = table();
        let start = NaiveDate::from_ymd_opt(2024, 1, 3);
        let end = NaiveDate::from_ymd_opt(2024, 1, 5);
        table.set_filter("filed_on", FilterValue::range(start, end)).unwrap();
        let view = table.view(&records);
        let ids: Vec<RecordId> = view.rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![RecordId::Int(2), RecordId::Int(3), RecordId::Int(4)]);
    }

    #[test]
    fn test_row_actions_follow_permissions() {
        let table = table();
        let viewer = Actor::new("viewer", PermissionSet::read_only());
        let editor = Actor::new("editor", PermissionSet::read_only().with(Permission::Edit));

        assert!(table.row_actions(&viewer).is_empty());
        assert_eq!(table.row_actions(&editor), vec![RowAction::Edit]);
        assert_eq!(table.row_actions(&Actor::system()), vec![RowAction::Edit, RowAction::Delete]);
    }

    #[test]
    fn test_render_row_uses_leaf_columns() {
        let table = table();
        let record = DynamicRecord::new(1).with("branch", "RTC 9");
        assert_eq!(table.render_row(&record), vec!["1", "RTC 9", ""]);
    }
}

//! Declarative table columns and the two-tier header layout

use std::fmt;
use std::sync::Arc;

use docket_core::Record;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal alignment of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Renders one cell of a record
pub type CellRenderer<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

/// One displayed column
pub struct ColumnDef<R> {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub align: Align,
    render: Option<CellRenderer<R>>,
}

impl<R> Clone for ColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            align: self.align,
            render: self.render.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("align", &self.align)
            .field("custom_render", &self.render.is_some())
            .finish()
    }
}

impl<R: Record> ColumnDef<R> {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            align: Align::Left,
            render: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn render_with(mut self, render: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Cell text for `record`; without a renderer this is the field's
    /// display value
    pub fn render(&self, record: &R) -> String {
        match &self.render {
            Some(render) => render(record),
            None => record.field(&self.key).to_string(),
        }
    }
}

/// A header spanning several child columns
pub struct GroupColumnDef<R> {
    pub title: String,
    pub align: Align,
    pub children: Vec<ColumnDef<R>>,
}

impl<R> Clone for GroupColumnDef<R> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            align: self.align,
            children: self.children.clone(),
        }
    }
}

impl<R> fmt::Debug for GroupColumnDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupColumnDef")
            .field("title", &self.title)
            .field("align", &self.align)
            .field("children", &self.children)
            .finish()
    }
}

impl<R> GroupColumnDef<R> {
    pub fn new(title: impl Into<String>, children: Vec<ColumnDef<R>>) -> Self {
        Self {
            title: title.into(),
            align: Align::Center,
            children,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// Top-level entry of a column list
pub enum ColumnEntry<R> {
    Leaf(ColumnDef<R>),
    Group(GroupColumnDef<R>),
}

impl<R> Clone for ColumnEntry<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(column) => Self::Leaf(column.clone()),
            Self::Group(group) => Self::Group(group.clone()),
        }
    }
}

impl<R> fmt::Debug for ColumnEntry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(column) => f.debug_tuple("Leaf").field(column).finish(),
            Self::Group(group) => f.debug_tuple("Group").field(group).finish(),
        }
    }
}

impl<R> ColumnEntry<R> {
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

impl<R> From<ColumnDef<R>> for ColumnEntry<R> {
    fn from(column: ColumnDef<R>) -> Self {
        Self::Leaf(column)
    }
}

impl<R> From<GroupColumnDef<R>> for ColumnEntry<R> {
    fn from(group: GroupColumnDef<R>) -> Self {
        Self::Group(group)
    }
}

/// Expand groups into their children, preserving left-to-right order
pub fn flatten<R>(entries: &[ColumnEntry<R>]) -> Vec<&ColumnDef<R>> {
    entries
        .iter()
        .flat_map(|entry| match entry {
            ColumnEntry::Leaf(column) => std::slice::from_ref(column).iter(),
            ColumnEntry::Group(group) => group.children.iter(),
        })
        .collect()
}

/// One cell of the rendered header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub label: String,
    pub col_span: usize,
    pub row_span: usize,
    pub align: Align,
    /// Present when clicking this cell toggles the sort
    pub sort_key: Option<String>,
}

impl HeaderCell {
    fn leaf<R>(column: &ColumnDef<R>, row_span: usize) -> Self {
        Self {
            label: column.label.clone(),
            col_span: 1,
            row_span,
            align: column.align,
            sort_key: column.sortable.then(|| column.key.clone()),
        }
    }
}

/// Header rows for `entries`.
///
/// Without groups this is a single row of leaf cells. With at least one
/// group there are two rows: the first holds group titles (spanning their
/// children) and standalone leaves with `row_span = 2`; the second holds
/// only group children.
pub fn header_rows<R>(entries: &[ColumnEntry<R>]) -> Vec<Vec<HeaderCell>> {
    let grouped = entries.iter().any(ColumnEntry::is_group);
    if !grouped {
        let row = entries
            .iter()
            .filter_map(|entry| match entry {
                ColumnEntry::Leaf(column) => Some(HeaderCell::leaf(column, 1)),
                ColumnEntry::Group(_) => None,
            })
            .collect();
        return vec![row];
    }

    let mut top = Vec::with_capacity(entries.len());
    let mut bottom = Vec::new();
    for entry in entries {
        match entry {
            ColumnEntry::Leaf(column) => top.push(HeaderCell::leaf(column, 2)),
            ColumnEntry::Group(group) => {
                top.push(HeaderCell {
                    label: group.title.clone(),
                    col_span: group.children.len(),
                    row_span: 1,
                    align: group.align,
                    sort_key: None,
                });
                bottom.extend(group.children.iter().map(|child| HeaderCell::leaf(child, 1)));
            }
        }
    }
    vec![top, bottom]
}

/// Errors in a column configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("column '{0}' does not name a field of the record")]
    UnknownKey(String),

    #[error("column '{0}' is declared more than once")]
    DuplicateKey(String),

    #[error("group '{0}' has no child columns")]
    EmptyGroup(String),
}

/// Check every leaf key against the record's field names
pub fn validate_keys<R>(entries: &[ColumnEntry<R>], fields: &[&str]) -> Result<(), ColumnError> {
    for entry in entries {
        match entry {
            ColumnEntry::Group(group) if group.children.is_empty() => {
                return Err(ColumnError::EmptyGroup(group.title.clone()));
            }
            _ => {}
        }
    }

    let mut seen = std::collections::HashSet::new();
    for column in flatten(entries) {
        if !fields.contains(&column.key.as_str()) {
            return Err(ColumnError::UnknownKey(column.key.clone()));
        }
        if !seen.insert(column.key.as_str()) {
            return Err(ColumnError::DuplicateKey(column.key.clone()));
        }
    }
    Ok(())
}

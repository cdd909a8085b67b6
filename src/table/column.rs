//! Column specifications: how a column reads, renders and sorts a row.

use crate::catalog::{CategoryCode, Status};
use crate::table::value::{CellValue, TableRow};
use std::fmt;
use std::sync::Arc;

/// How a cell is rendered.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderType {
    Text,
    Link,
    Tags,
    Status,
}

/// Where a column's value comes from.
pub enum Accessor<T> {
    /// A named field of the row.
    Field(String),
    /// A value computed from the whole row.
    Derived(Arc<dyn Fn(&T) -> CellValue + Send + Sync>),
}

impl<T: TableRow> Accessor<T> {
    pub fn resolve(&self, row: &T) -> CellValue {
        match self {
            Accessor::Field(key) => row.field(key),
            Accessor::Derived(compute) => compute(row),
        }
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Field(key) => Accessor::Field(key.clone()),
            Accessor::Derived(compute) => Accessor::Derived(Arc::clone(compute)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(key) => f.debug_tuple("Field").field(key).finish(),
            Accessor::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Rank of each status for status-ordinal sorting; lower ranks sort first
/// ascending.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusOrder {
    pub yes: u8,
    pub partial: u8,
    pub no: u8,
    pub unknown: u8,
}

impl StatusOrder {
    pub const DEFAULT: StatusOrder = StatusOrder::new(0, 1, 2, 3);

    pub const fn new(yes: u8, partial: u8, no: u8, unknown: u8) -> Self {
        Self {
            yes,
            partial,
            no,
            unknown,
        }
    }

    pub fn rank(&self, status: Status) -> u8 {
        match status {
            Status::Yes => self.yes,
            Status::Partial => self.partial,
            Status::No => self.no,
            Status::Unknown => self.unknown,
        }
    }
}

impl Default for StatusOrder {
    fn default() -> Self {
        StatusOrder::DEFAULT
    }
}

/// Comparison a column sorts by, derived from its render type. Tag columns
/// never sort.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortStrategy {
    Alphanumeric,
    StatusOrdinal(StatusOrder),
    Disabled,
}

/// One column of a table over rows of type `T`.
///
/// Without an explicit accessor the column reads the row field named by `id`.
pub struct ColumnSpec<T> {
    pub id: String,
    pub header: Option<String>,
    pub render: RenderType,
    pub accessor: Option<Accessor<T>>,
    pub sortable: bool,
    pub status_order: Option<StatusOrder>,
    pub note: Option<Accessor<T>>,
    pub href: Option<Accessor<T>>,
}

impl<T> Clone for ColumnSpec<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            render: self.render,
            accessor: self.accessor.clone(),
            sortable: self.sortable,
            status_order: self.status_order,
            note: self.note.clone(),
            href: self.href.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("render", &self.render)
            .field("accessor", &self.accessor)
            .field("sortable", &self.sortable)
            .field("status_order", &self.status_order)
            .finish_non_exhaustive()
    }
}

impl<T> ColumnSpec<T> {
    pub fn new(id: impl Into<String>, render: RenderType) -> Self {
        Self {
            id: id.into(),
            header: None,
            render,
            accessor: None,
            sortable: true,
            status_order: None,
            note: None,
            href: None,
        }
    }

    pub fn text(id: impl Into<String>) -> Self {
        Self::new(id, RenderType::Text)
    }

    pub fn link(id: impl Into<String>) -> Self {
        Self::new(id, RenderType::Link)
    }

    pub fn tags(id: impl Into<String>) -> Self {
        Self::new(id, RenderType::Tags)
    }

    pub fn status(id: impl Into<String>) -> Self {
        Self::new(id, RenderType::Status)
    }

    pub fn header(mut self, label: impl Into<String>) -> Self {
        self.header = Some(label.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>) -> Self {
        self.accessor = Some(Accessor::Field(key.into()));
        self
    }

    pub fn derived<F>(mut self, compute: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        self.accessor = Some(Accessor::Derived(Arc::new(compute)));
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Override the status ranking of a status column.
    pub fn order(mut self, order: StatusOrder) -> Self {
        self.status_order = Some(order);
        self
    }

    /// Field holding the free-text note shown next to the cell.
    pub fn note(mut self, key: impl Into<String>) -> Self {
        self.note = Some(Accessor::Field(key.into()));
        self
    }

    /// Field holding the link target of a link column.
    pub fn href(mut self, key: impl Into<String>) -> Self {
        self.href = Some(Accessor::Field(key.into()));
        self
    }

    pub fn header_label(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    pub fn sort_strategy(&self) -> SortStrategy {
        if !self.sortable {
            return SortStrategy::Disabled;
        }
        match self.render {
            RenderType::Status => {
                SortStrategy::StatusOrdinal(self.status_order.unwrap_or_default())
            }
            RenderType::Text | RenderType::Link => SortStrategy::Alphanumeric,
            RenderType::Tags => SortStrategy::Disabled,
        }
    }
}

impl<T: TableRow> ColumnSpec<T> {
    pub fn value(&self, row: &T) -> CellValue {
        match &self.accessor {
            Some(accessor) => accessor.resolve(row),
            None => row.field(&self.id),
        }
    }

    pub fn note_text(&self, row: &T) -> Option<String> {
        self.note.as_ref().and_then(|note| note.resolve(row).as_text())
    }

    pub fn href_text(&self, row: &T) -> Option<String> {
        self.href.as_ref().and_then(|href| href.resolve(row).as_text())
    }

    /// Plain-text rendering of the cell. Missing values render as `N/A`;
    /// notes follow in brackets.
    pub fn display(&self, row: &T) -> String {
        let value = self.value(row);
        let mut rendered = match self.render {
            RenderType::Status => value.status().as_str().to_string(),
            RenderType::Tags => value
                .codes()
                .iter()
                .map(CategoryCode::display)
                .collect::<Vec<_>>()
                .join(", "),
            RenderType::Text | RenderType::Link => {
                value.as_text().unwrap_or_else(|| "N/A".to_string())
            }
        };
        if let Some(note) = self.note_text(row) {
            rendered.push_str(&format!(" [{note}]"));
        }
        rendered
    }
}

//! Generic table engine.
//!
//! Rows are any `TableRow`; columns are `ColumnSpec`s. `build_view` filters
//! then sorts references to the input rows and never mutates them, so a view
//! is always recomputed from the source rows plus the current state.

pub mod column;
pub mod filter;
pub mod sections;
pub mod sort;
pub mod value;

pub use column::{Accessor, ColumnSpec, RenderType, SortStrategy, StatusOrder};
pub use filter::{CategoryFilter, SearchFilter};
pub use sections::section_columns;
pub use sort::{SortDirection, SortState, compare_alphanumeric, sort_rows};
pub use value::{CellValue, TableRow};

use tracing::debug;

/// Filter `rows` with `filter`, then sort by the active column of `sort`.
///
/// An active sort naming a column that is absent or unsortable leaves the
/// filtered rows in source order.
pub fn build_view<'a, T, F>(
    rows: &'a [T],
    columns: &[ColumnSpec<T>],
    sort: &SortState,
    filter: F,
) -> Vec<&'a T>
where
    T: TableRow,
    F: Fn(&T) -> bool,
{
    let mut view: Vec<&T> = rows.iter().filter(|&row| filter(row)).collect();
    let (Some(column_id), Some(direction)) = (sort.column(), sort.direction()) else {
        return view;
    };
    match columns.iter().find(|column| column.id == column_id) {
        Some(column) => sort_rows(&mut view, column, direction),
        None => debug!(column = column_id, "sort column not in table; keeping source order"),
    }
    view
}

/// Render a view as aligned plain-text lines: a header, a rule, then rows.
pub fn render_plain<T: TableRow>(view: &[&T], columns: &[ColumnSpec<T>]) -> Vec<String> {
    let header: Vec<String> = columns
        .iter()
        .map(|column| column.header_label().to_string())
        .collect();
    let body: Vec<Vec<String>> = view
        .iter()
        .map(|row| columns.iter().map(|column| column.display(row)).collect())
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|index| {
            std::iter::once(&header)
                .chain(body.iter())
                .map(|cells| cells[index].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(line(&header));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(body.iter().map(|cells| line(cells)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Record, SectionKind};
    use serde_json::{Value, json};

    fn records() -> Vec<Record> {
        [
            json!({"tool": "Tor66", "categories": ["SE"], "API": null, "maintained": true}),
            json!({"tool": "ahmia", "categories": ["se", "idx"], "API": true, "maintained": "partial",
                   "description": "Tor search engine"}),
            json!({"tool": "Dread", "categories": ["FOR"], "API": false, "maintained": false}),
            json!({"tool": "Tor5", "categories": ["SE"], "API": "yes", "maintained": null}),
        ]
        .iter()
        .map(|value| Record::from_value(SectionKind::Darknet, value).unwrap())
        .collect()
    }

    fn tools(view: &[&Record]) -> Vec<String> {
        view.iter().map(|record| record.tool.clone()).collect()
    }

    #[test]
    fn view_filters_then_sorts_without_touching_rows() {
        let rows = records();
        let before = rows.clone();
        let columns = section_columns(SectionKind::Darknet);
        let categories = CategoryFilter::new(["se"]);
        let search = SearchFilter::new("");

        let view = build_view(&rows, &columns, &SortState::ascending("tool"), |row| {
            categories.matches_row(row) && search.matches_row(row)
        });
        assert_eq!(tools(&view), vec!["ahmia", "Tor5", "Tor66"]);

        let view = build_view(&rows, &columns, &SortState::descending("maintained"), |_| true);
        assert_eq!(tools(&view), vec!["Tor5", "Dread", "ahmia", "Tor66"]);
        assert_eq!(rows, before);
    }

    #[test]
    fn unsorted_or_unknown_column_keeps_source_order() {
        let rows = records();
        let columns = section_columns(SectionKind::Darknet);
        let source = tools(&rows.iter().collect::<Vec<_>>());
        for state in [
            SortState::unsorted(),
            SortState::ascending("no_such_column"),
            SortState::ascending("description"),
            SortState::ascending("categories"),
        ] {
            assert_eq!(tools(&build_view(&rows, &columns, &state, |_| true)), source);
        }
    }

    #[test]
    fn search_uses_derived_index() {
        let rows = records();
        let columns = section_columns(SectionKind::Darknet);
        let search = SearchFilter::new("SEARCH ENGINE");
        let view = build_view(&rows, &columns, &SortState::unsorted(), |row| {
            search.matches_row(row)
        });
        assert_eq!(tools(&view), vec!["ahmia"]);
    }

    #[test]
    fn generic_rows_render_as_aligned_lines() {
        let rows = vec![
            json!({"tool": "b", "API": true}),
            json!({"tool": "alpha", "API": null, "API_note": "docs"}),
        ];
        let columns: Vec<ColumnSpec<Value>> = vec![
            ColumnSpec::text("tool").header("Tool"),
            ColumnSpec::status("API").note("API_note"),
        ];
        let view = build_view(&rows, &columns, &SortState::ascending("tool"), |_| true);
        let lines = render_plain(&view, &columns);
        assert_eq!(lines[0], "Tool   API");
        assert_eq!(lines[1], "-----  --------------");
        assert_eq!(lines[2], "alpha  unknown [docs]");
        assert_eq!(lines[3], "b      yes");
    }
}

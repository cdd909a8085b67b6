//! Sorting: comparators, the per-table sort state, and stable row sorting.

use crate::table::column::{ColumnSpec, SortStrategy};
use crate::table::value::TableRow;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The active sort of a table: at most one column at a time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SortState {
    active: Option<(String, SortDirection)>,
}

impl SortState {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            active: Some((column.into(), SortDirection::Ascending)),
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            active: Some((column.into(), SortDirection::Descending)),
        }
    }

    pub fn column(&self) -> Option<&str> {
        self.active.as_ref().map(|(column, _)| column.as_str())
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.active.as_ref().map(|(_, direction)| *direction)
    }

    pub fn is_sorted(&self) -> bool {
        self.active.is_some()
    }

    /// Cycle the sort for a header click: ascending, descending, unsorted.
    /// Switching to another column starts over at ascending; columns that
    /// cannot sort leave the state untouched.
    pub fn toggle<T>(&mut self, column: &ColumnSpec<T>) {
        if column.sort_strategy() == SortStrategy::Disabled {
            return;
        }
        self.active = match self.active.take() {
            Some((id, SortDirection::Ascending)) if id == column.id => {
                Some((id, SortDirection::Descending))
            }
            Some((id, SortDirection::Descending)) if id == column.id => None,
            _ => Some((column.id.clone(), SortDirection::Ascending)),
        };
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(text: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (index, ch) in text.char_indices() {
        let digit = ch.is_ascii_digit();
        match in_digits {
            Some(previous) if previous != digit => {
                out.push(chunk(&text[start..index], previous));
                start = index;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }
    if let Some(digit) = in_digits {
        out.push(chunk(&text[start..], digit));
    }
    out
}

fn chunk(text: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(text)
    } else {
        Chunk::Text(text)
    }
}

fn compare_digits(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

/// Case-insensitive natural comparison: runs of digits compare by numeric
/// value, so `tool2` sorts before `tool10`. At a position where one side has
/// text and the other digits, text sorts first.
pub fn compare_alphanumeric(left: &str, right: &str) -> Ordering {
    let left = left.to_lowercase();
    let right = right.to_lowercase();
    let left_chunks = chunks(&left);
    let right_chunks = chunks(&right);
    for (a, b) in left_chunks.iter().zip(right_chunks.iter()) {
        let ordering = match (a, b) {
            (Chunk::Digits(a), Chunk::Digits(b)) => compare_digits(a, b),
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Less,
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left_chunks.len().cmp(&right_chunks.len())
}

/// Stable in-place sort of `rows` by `column`. Alphanumeric columns keep rows
/// without a value at the end in either direction.
pub fn sort_rows<T: TableRow>(rows: &mut [&T], column: &ColumnSpec<T>, direction: SortDirection) {
    let apply = |ordering: Ordering| match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };
    match column.sort_strategy() {
        SortStrategy::Disabled => {}
        SortStrategy::StatusOrdinal(order) => {
            rows.sort_by(|a, b| {
                let left = order.rank(column.value(a).status());
                let right = order.rank(column.value(b).status());
                apply(left.cmp(&right))
            });
        }
        SortStrategy::Alphanumeric => {
            rows.sort_by(|a, b| {
                match (column.value(a).as_text(), column.value(b).as_text()) {
                    (Some(left), Some(right)) => apply(compare_alphanumeric(&left, &right)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::StatusOrder;
    use serde_json::{Value, json};

    fn names(rows: &[&Value]) -> Vec<String> {
        rows.iter()
            .map(|row| row["tool"].as_str().unwrap_or("-").to_string())
            .collect()
    }

    #[test]
    fn alphanumeric_orders_digit_runs_numerically() {
        let mut values = vec!["tool10", "Tool2", "tool1", "alpha", "tool", "tool02b"];
        values.sort_by(|a, b| compare_alphanumeric(a, b));
        assert_eq!(values, vec!["alpha", "tool", "tool1", "Tool2", "tool02b", "tool10"]);
        assert_eq!(compare_alphanumeric("Shodan", "shodan"), Ordering::Equal);
        assert_eq!(compare_alphanumeric("a1", "ab"), Ordering::Less);
        assert_eq!(compare_alphanumeric("1a", "ab"), Ordering::Greater);
    }

    #[test]
    fn toggle_cycles_ascending_descending_unsorted() {
        let tool: ColumnSpec<Value> = ColumnSpec::text("tool");
        let api: ColumnSpec<Value> = ColumnSpec::status("API");
        let description: ColumnSpec<Value> = ColumnSpec::text("description").unsortable();

        let mut state = SortState::unsorted();
        state.toggle(&tool);
        assert_eq!(state, SortState::ascending("tool"));
        state.toggle(&tool);
        assert_eq!(state, SortState::descending("tool"));
        state.toggle(&tool);
        assert!(!state.is_sorted());

        state.toggle(&tool);
        state.toggle(&api);
        assert_eq!(state, SortState::ascending("API"));
        state.toggle(&description);
        assert_eq!(state, SortState::ascending("API"));
    }

    #[test]
    fn status_sort_uses_ordinal_ranks() {
        let rows: Vec<Value> = ["no", "yes", "partial", "unknown"]
            .iter()
            .map(|status| json!({"tool": status, "API": status}))
            .collect();
        let api: ColumnSpec<Value> = ColumnSpec::status("API");

        let mut view: Vec<&Value> = rows.iter().collect();
        sort_rows(&mut view, &api, SortDirection::Ascending);
        assert_eq!(names(&view), vec!["yes", "partial", "no", "unknown"]);
        sort_rows(&mut view, &api, SortDirection::Descending);
        assert_eq!(names(&view), vec!["unknown", "no", "partial", "yes"]);

        let open_source: ColumnSpec<Value> =
            ColumnSpec::status("API").order(StatusOrder::new(1, 2, 0, 3));
        sort_rows(&mut view, &open_source, SortDirection::Ascending);
        assert_eq!(names(&view), vec!["no", "yes", "partial", "unknown"]);
    }

    #[test]
    fn status_sort_coerces_booleans_and_nulls() {
        let rows = vec![
            json!({"tool": "a", "API": null}),
            json!({"tool": "b", "API": false}),
            json!({"tool": "c", "API": true}),
        ];
        let api: ColumnSpec<Value> = ColumnSpec::status("API");
        let mut view: Vec<&Value> = rows.iter().collect();
        sort_rows(&mut view, &api, SortDirection::Ascending);
        assert_eq!(names(&view), vec!["c", "b", "a"]);
    }

    #[test]
    fn missing_text_sorts_last_in_both_directions() {
        let rows = vec![
            json!({"tool": "b", "description": null}),
            json!({"tool": "a", "description": "zeta"}),
            json!({"tool": "c", "description": "Alpha"}),
            json!({"tool": "d"}),
        ];
        let description: ColumnSpec<Value> = ColumnSpec::text("description");
        let mut view: Vec<&Value> = rows.iter().collect();
        sort_rows(&mut view, &description, SortDirection::Ascending);
        assert_eq!(names(&view), vec!["c", "a", "b", "d"]);
        sort_rows(&mut view, &description, SortDirection::Descending);
        assert_eq!(names(&view), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let rows = vec![
            json!({"tool": "first", "API": true}),
            json!({"tool": "second", "API": "yes"}),
            json!({"tool": "third", "API": true}),
        ];
        let api: ColumnSpec<Value> = ColumnSpec::status("API");
        let mut view: Vec<&Value> = rows.iter().collect();
        sort_rows(&mut view, &api, SortDirection::Descending);
        assert_eq!(names(&view), vec!["first", "second", "third"]);
    }
}

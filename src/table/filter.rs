//! Row filters. Both filters pass every row while inactive and compose with `&&`.

use crate::catalog::CategoryCode;
use crate::table::value::TableRow;
use std::collections::BTreeSet;

/// Selected category codes; a row passes when it carries any of them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CategoryFilter {
    selected: BTreeSet<CategoryCode>,
}

impl CategoryFilter {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected = codes
            .into_iter()
            .map(|code| CategoryCode::new(code.as_ref()))
            .filter(|code| !code.as_str().is_empty())
            .collect();
        Self { selected }
    }

    /// Flip one code in or out of the selection.
    pub fn toggle(&mut self, code: &CategoryCode) {
        if !self.selected.remove(code) {
            self.selected.insert(code.clone());
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = &CategoryCode> {
        self.selected.iter()
    }

    pub fn matches(&self, categories: &[CategoryCode]) -> bool {
        self.selected.is_empty() || categories.iter().any(|code| self.selected.contains(code))
    }

    pub fn matches_row<T: TableRow>(&self, row: &T) -> bool {
        self.selected.is_empty() || self.matches(&row.categories())
    }
}

/// Case-insensitive substring search over a row's search terms.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SearchFilter {
    needle: String,
}

impl SearchFilter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.needle.is_empty()
    }

    pub fn matches_row<T: TableRow>(&self, row: &T) -> bool {
        self.needle.is_empty()
            || row
                .search_terms()
                .iter()
                .any(|term| term.contains(&self.needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_filter_is_case_insensitive_or() {
        let row = json!({"tool": "Ahmia", "categories": ["SE", "idx"]});
        let other = json!({"tool": "Dread", "categories": ["FOR"]});

        let mut filter = CategoryFilter::default();
        assert!(filter.matches_row(&row) && filter.matches_row(&other));

        filter.toggle(&CategoryCode::new("se"));
        filter.toggle(&CategoryCode::new("MK"));
        assert!(filter.matches_row(&row));
        assert!(!filter.matches_row(&other));

        filter.toggle(&CategoryCode::new("Se"));
        assert!(!filter.matches_row(&row));
        filter.clear();
        assert!(!filter.is_active());
        assert!(filter.matches_row(&other));
    }

    #[test]
    fn rows_without_categories_only_pass_inactive_filter() {
        let row = json!({"tool": "bare"});
        assert!(CategoryFilter::default().matches_row(&row));
        assert!(!CategoryFilter::new(["se"]).matches_row(&row));
    }

    #[test]
    fn search_matches_tool_and_description_substrings() {
        let row = json!({"tool": "Wayback Machine", "description": "Archived web pages"});
        assert!(SearchFilter::new("WAYBACK").matches_row(&row));
        assert!(SearchFilter::new(" web pa").matches_row(&row));
        assert!(SearchFilter::new("").matches_row(&row));
        assert!(!SearchFilter::new("shodan").matches_row(&row));
    }
}

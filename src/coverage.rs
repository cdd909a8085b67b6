//! Category usage accounting for a section.
//!
//! `CategoryUsage` works on raw JSON so the validator can cross-check
//! categories even when the document fails its schema. `build_category_coverage`
//! works on a validated `Section` and feeds category pickers and reports.

use crate::catalog::{CategoryCode, Section};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Where one category code is used inside a section document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEntry {
    /// Spelling of the first occurrence, kept for error messages.
    pub spelling: String,
    /// Locator of the first occurrence, e.g. `data[3].categories[0]`.
    pub first_path: String,
    /// Indices of the records using the code, ascending and unique.
    pub records: Vec<usize>,
}

/// Category codes used across a section's raw records.
#[derive(Debug, Clone, Default)]
pub struct CategoryUsage {
    entries: BTreeMap<CategoryCode, UsageEntry>,
}

impl CategoryUsage {
    /// Collect usage from raw record objects. Non-string entries and records
    /// without a `categories` array are skipped; the schema reports those.
    /// Blank codes are kept under the empty code so integrity checks see them.
    pub fn from_documents(records: &[Value]) -> Self {
        let mut entries: BTreeMap<CategoryCode, UsageEntry> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            let Some(categories) = record.get("categories").and_then(Value::as_array) else {
                continue;
            };
            for (position, raw) in categories.iter().enumerate() {
                let Some(raw) = raw.as_str() else {
                    continue;
                };
                let code = CategoryCode::new(raw);
                let entry = entries.entry(code).or_insert_with(|| UsageEntry {
                    spelling: raw.trim().to_string(),
                    first_path: format!("data[{index}].categories[{position}]"),
                    records: Vec::new(),
                });
                if entry.records.last() != Some(&index) {
                    entry.records.push(index);
                }
            }
        }
        Self { entries }
    }

    pub fn get(&self, code: &CategoryCode) -> Option<&UsageEntry> {
        self.entries.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryCode, &UsageEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Whether a declared category has records plus the tools tagged with it.
pub struct CoverageEntry {
    pub name: String,
    pub used: bool,
    pub tools: Vec<String>,
}

/// Build a mapping of declared category to the tools tagged with it.
///
/// Every declared category gets an entry, used or not; tool names keep
/// record order and are deduplicated.
pub fn build_category_coverage(section: &Section) -> BTreeMap<CategoryCode, CoverageEntry> {
    let mut map: BTreeMap<CategoryCode, CoverageEntry> = section
        .categories
        .iter()
        .map(|(code, meta)| {
            (
                code.clone(),
                CoverageEntry {
                    name: meta.name.clone(),
                    used: false,
                    tools: Vec::new(),
                },
            )
        })
        .collect();

    for record in &section.records {
        for code in &record.categories {
            let Some(entry) = map.get_mut(code) else {
                continue;
            };
            entry.used = true;
            if !entry.tools.contains(&record.tool) {
                entry.tools.push(record.tool.clone());
            }
        }
    }

    map
}

/// Declared categories no record uses.
pub fn unused_categories(coverage: &BTreeMap<CategoryCode, CoverageEntry>) -> Vec<CategoryCode> {
    coverage
        .iter()
        .filter(|(_, entry)| !entry.used)
        .map(|(code, _)| code.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SectionKind;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn usage_tracks_first_occurrence_and_unique_records() {
        let records = vec![
            json!({"categories": ["Se", "se", 7]}),
            json!({"categories": "se"}),
            json!({"categories": ["MK", "SE"]}),
        ];
        let usage = CategoryUsage::from_documents(&records);
        assert_eq!(usage.len(), 2);
        let se = usage.get(&CategoryCode::new("SE")).unwrap();
        assert_eq!(se.spelling, "Se");
        assert_eq!(se.first_path, "data[0].categories[0]");
        assert_eq!(se.records, vec![0, 2]);
    }

    #[test]
    fn usage_keeps_blank_codes() {
        let records = vec![json!({"categories": ["SE", "   "]}), json!({"categories": [""]})];
        let usage = CategoryUsage::from_documents(&records);
        let blank = usage.get(&CategoryCode::new("")).unwrap();
        assert_eq!(blank.first_path, "data[0].categories[1]");
        assert_eq!(blank.records, vec![0, 1]);
    }

    #[test]
    fn coverage_lists_tools_and_unused_codes() {
        let document = json!({
            "meta": {"categories": {"SE": {"name": "Search"}, "MK": {"name": "Markets"}}},
            "data": [
                {"tool": "Ahmia", "categories": ["SE"], "API": null, "maintained": true},
                {"tool": "Torch", "categories": ["se"], "API": null, "maintained": false}
            ]
        });
        let validated = validate(SectionKind::Darknet, &document).unwrap();
        let coverage = build_category_coverage(&validated.section);
        let se = &coverage[&CategoryCode::new("se")];
        assert!(se.used);
        assert_eq!(se.tools, vec!["Ahmia".to_string(), "Torch".to_string()]);
        assert_eq!(unused_categories(&coverage), vec![CategoryCode::new("mk")]);
    }
}

//! Holds the loaded sections and answers cross-section questions.
//!
//! Sections are keyed by `SectionKind`; registering a section again replaces
//! the previous copy wholesale, never patches it.

use crate::catalog::identity::SectionKind;
use crate::catalog::model::{Record, Section};
use serde::Serialize;
use std::collections::BTreeMap;

/// A primary name that occurs more than once across the registered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateName {
    /// Trimmed, lower-cased name.
    pub name: String,
    /// Section of every occurrence, in registration order.
    pub sections: Vec<SectionKind>,
}

#[derive(Default, Debug)]
/// In-memory store for validated sections keyed by `SectionKind`.
pub struct CatalogRepository {
    sections: BTreeMap<SectionKind, Section>,
}

/// Key used for case- and whitespace-insensitive name comparisons.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl CatalogRepository {
    /// Register a section for later lookup, replacing any previous copy.
    pub fn register(&mut self, section: Section) {
        self.sections.insert(section.kind, section);
    }

    pub fn get(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.get(&kind)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn total_records(&self) -> usize {
        self.sections.values().map(|section| section.records.len()).sum()
    }

    /// Every record named `name`, ignoring case and surrounding whitespace.
    pub fn find_tool(&self, name: &str) -> Vec<(SectionKind, &Record)> {
        let key = name_key(name);
        self.sections
            .values()
            .flat_map(|section| {
                section
                    .records
                    .iter()
                    .filter(|record| name_key(&record.tool) == key)
                    .map(move |record| (section.kind, record))
            })
            .collect()
    }

    /// Names used by more than one record, in name order.
    pub fn duplicate_names(&self) -> Vec<DuplicateName> {
        let mut seen: BTreeMap<String, Vec<SectionKind>> = BTreeMap::new();
        for section in self.sections.values() {
            for record in &section.records {
                seen.entry(name_key(&record.tool))
                    .or_default()
                    .push(section.kind);
            }
        }
        seen.into_iter()
            .filter(|(_, sections)| sections.len() > 1)
            .map(|(name, sections)| DuplicateName { name, sections })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategoryDictionary, SearchIndex, SectionFields};
    use crate::catalog::{Flag, Status};

    fn record(tool: &str, fields: SectionFields) -> Record {
        Record {
            tool: tool.to_string(),
            categories: Vec::new(),
            link: None,
            description: None,
            api: Flag::new(Status::Unknown, None),
            fields,
            search: SearchIndex::derive(tool, None),
        }
    }

    fn section(kind: SectionKind, records: Vec<Record>) -> Section {
        Section {
            kind,
            categories: CategoryDictionary::default(),
            records,
        }
    }

    #[test]
    fn duplicate_names_ignore_case_and_whitespace() {
        let mut repo = CatalogRepository::default();
        repo.register(section(
            SectionKind::SearchEngines,
            vec![record("Shodan", SectionFields::SearchEngines)],
        ));
        repo.register(section(
            SectionKind::Mixed,
            vec![
                record(
                    " shodan ",
                    SectionFields::Mixed {
                        maintained: Flag::default(),
                    },
                ),
                record(
                    "Censys",
                    SectionFields::Mixed {
                        maintained: Flag::default(),
                    },
                ),
            ],
        ));

        assert_eq!(repo.total_records(), 3);
        assert_eq!(
            repo.duplicate_names(),
            vec![DuplicateName {
                name: "shodan".to_string(),
                sections: vec![SectionKind::SearchEngines, SectionKind::Mixed],
            }]
        );
        let hits = repo.find_tool("SHODAN");
        assert_eq!(hits.len(), 2);
        assert!(repo.find_tool("missing").is_empty());
    }

    #[test]
    fn register_replaces_previous_section() {
        let mut repo = CatalogRepository::default();
        repo.register(section(
            SectionKind::SearchEngines,
            vec![record("Google", SectionFields::SearchEngines)],
        ));
        repo.register(section(SectionKind::SearchEngines, Vec::new()));
        assert_eq!(repo.get(SectionKind::SearchEngines).unwrap().records.len(), 0);
        assert!(repo.get(SectionKind::Mixed).is_none());
    }
}

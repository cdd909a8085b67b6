//! Default column sets for each section's table.

use crate::catalog::{Record, SectionKind};
use crate::table::column::{ColumnSpec, StatusOrder};

/// Indexed-internet sources list closed tools first when sorting by licence.
pub const OPEN_SOURCE_NO_FIRST: StatusOrder = StatusOrder::new(1, 2, 0, 3);

fn tool(label: &str) -> ColumnSpec<Record> {
    ColumnSpec::link("tool").header(label).href("link")
}

fn categories() -> ColumnSpec<Record> {
    ColumnSpec::tags("categories").header("Categories")
}

fn flag(id: &str, label: &str) -> ColumnSpec<Record> {
    ColumnSpec::status(id).header(label).note(format!("{id}_note"))
}

fn description() -> ColumnSpec<Record> {
    ColumnSpec::text("description")
        .header("Description")
        .unsortable()
}

pub fn section_columns(kind: SectionKind) -> Vec<ColumnSpec<Record>> {
    match kind {
        SectionKind::IndexedInternet => vec![
            tool("Tool"),
            categories(),
            ColumnSpec::status("open_source")
                .header("Open Source")
                .order(OPEN_SOURCE_NO_FIRST),
            ColumnSpec::text("open_source_license").header("License"),
            flag("accessibility", "Accessibility"),
            flag("API", "API"),
            description(),
        ],
        SectionKind::ArchivedWeb => vec![
            tool("Tool"),
            categories(),
            ColumnSpec::status("open_source").header("Open Source"),
            flag("accessibility", "Accessibility"),
            flag("API", "API"),
            description(),
        ],
        SectionKind::NetworkDevices => vec![
            tool("Tool"),
            categories(),
            flag("services", "Services"),
            flag("CVE", "CVE"),
            flag("maintained", "Maintained"),
            flag("API", "API"),
            description(),
        ],
        SectionKind::Darknet | SectionKind::Mixed => vec![
            tool("Tool"),
            categories(),
            flag("maintained", "Maintained"),
            flag("API", "API"),
            description(),
        ],
        SectionKind::SocialNetworks => vec![
            tool("Tool"),
            categories(),
            ColumnSpec::text("social_network").header("Social Network"),
            flag("maintained", "Maintained"),
            flag("API", "API"),
            description(),
        ],
        SectionKind::SearchEngines => vec![
            tool("Tool"),
            categories(),
            flag("API", "API"),
            description(),
        ],
        SectionKind::DomainsIps => vec![
            tool("Name"),
            categories(),
            ColumnSpec::status("open_source").header("Open Source"),
            flag("accessibility", "Accessibility"),
            flag("API", "API"),
            flag("maintained", "Maintained"),
            description(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::{RenderType, SortStrategy};
    use crate::table::value::{CellValue, TableRow};
    use serde_json::json;

    #[test]
    fn every_section_column_resolves_on_its_records() {
        let samples = [
            (
                SectionKind::IndexedInternet,
                json!({"tool": "a", "categories": ["x"], "API": true, "open_source": true, "accessibility": "yes"}),
            ),
            (
                SectionKind::ArchivedWeb,
                json!({"tool": "a", "categories": ["x"], "API": true, "open_source": true, "accessibility": true}),
            ),
            (
                SectionKind::NetworkDevices,
                json!({"tool": "a", "categories": ["x"], "API": true, "services": true, "CVE": true, "maintained": true}),
            ),
            (
                SectionKind::Darknet,
                json!({"tool": "a", "categories": ["x"], "API": true, "maintained": true}),
            ),
            (
                SectionKind::SocialNetworks,
                json!({"tool": "a", "categories": ["x"], "API": true, "social_network": "X", "maintained": true}),
            ),
            (
                SectionKind::SearchEngines,
                json!({"tool": "a", "categories": ["x"], "API": true}),
            ),
            (
                SectionKind::DomainsIps,
                json!({"tool": "a", "categories": ["x"], "API": true, "open_source": true, "accessibility": true, "maintained": true}),
            ),
            (
                SectionKind::Mixed,
                json!({"tool": "a", "categories": ["x"], "API": true, "maintained": true}),
            ),
        ];
        for (kind, value) in samples {
            let record = Record::from_value(kind, &value).unwrap();
            for column in section_columns(kind) {
                if column.render == RenderType::Status {
                    assert_eq!(column.value(&record).status().as_str(), "yes", "{kind}.{}", column.id);
                } else if column.id != "description" && column.id != "open_source_license" {
                    assert_ne!(column.value(&record), CellValue::Missing, "{kind}.{}", column.id);
                }
            }
        }
    }

    #[test]
    fn indexed_internet_open_source_sorts_no_first() {
        let columns = section_columns(SectionKind::IndexedInternet);
        let open_source = columns.iter().find(|c| c.id == "open_source").unwrap();
        assert_eq!(
            open_source.sort_strategy(),
            SortStrategy::StatusOrdinal(OPEN_SOURCE_NO_FIRST)
        );
        let description = columns.iter().find(|c| c.id == "description").unwrap();
        assert_eq!(description.sort_strategy(), SortStrategy::Disabled);
    }

    #[test]
    fn tool_column_links_to_record_link() {
        let record = Record::from_value(
            SectionKind::SearchEngines,
            &json!({"tool": "Google", "categories": [], "API": "no", "link": "https://google.com"}),
        )
        .unwrap();
        let columns = section_columns(SectionKind::SearchEngines);
        assert_eq!(columns[0].display(&record), "Google");
        assert_eq!(columns[0].href_text(&record).as_deref(), Some("https://google.com"));
        assert_eq!(record.field("link").as_text().as_deref(), Some("https://google.com"));
    }
}

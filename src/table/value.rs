//! Cell values and the row abstraction the table engine reads from.

use crate::catalog::{CategoryCode, Flag, Record, SectionFields, Status};
use serde_json::Value;

/// A value resolved from a row for one column.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    Status(Status),
}

impl CellValue {
    pub fn from_optional(value: Option<&str>) -> Self {
        match value {
            Some(text) => CellValue::Text(text.to_string()),
            None => CellValue::Missing,
        }
    }

    /// Text used for alphanumeric sorting and plain display. Blank text counts
    /// as missing.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Missing => return None,
            CellValue::Bool(flag) => flag.to_string(),
            CellValue::Number(number) => number.to_string(),
            CellValue::Text(text) => text.clone(),
            CellValue::List(items) => items.join(", "),
            CellValue::Status(status) => status.as_str().to_string(),
        };
        if text.trim().is_empty() { None } else { Some(text) }
    }

    pub fn status(&self) -> Status {
        Status::from_cell(self)
    }

    /// Interpret the value as a list of category codes.
    pub fn codes(&self) -> Vec<CategoryCode> {
        match self {
            CellValue::List(items) => items.iter().map(|item| CategoryCode::new(item)).collect(),
            CellValue::Text(text) if !text.trim().is_empty() => vec![CategoryCode::new(text)],
            _ => Vec::new(),
        }
    }
}

impl Status {
    /// Coerce a cell into the status domain: booleans map to yes/no, strings
    /// are parsed leniently, anything else is unknown.
    pub fn from_cell(cell: &CellValue) -> Status {
        match cell {
            CellValue::Status(status) => *status,
            CellValue::Bool(flag) => Status::from_bool(*flag),
            CellValue::Text(text) => Status::coerce_str(text),
            CellValue::Missing | CellValue::Number(_) | CellValue::List(_) => Status::Unknown,
        }
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Missing,
            Value::Bool(flag) => CellValue::Bool(*flag),
            Value::Number(number) => number
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Missing),
            Value::String(text) => CellValue::Text(text.clone()),
            Value::Array(items) => CellValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::Object(_) => CellValue::Text(value.to_string()),
        }
    }
}

/// Anything the table engine can render: rows expose named fields.
pub trait TableRow {
    /// Resolve a named field; unknown names resolve to `CellValue::Missing`.
    fn field(&self, key: &str) -> CellValue;

    /// Category codes used for category filtering.
    fn categories(&self) -> Vec<CategoryCode> {
        self.field("categories").codes()
    }

    /// Lower-cased text matched by free-text search.
    fn search_terms(&self) -> Vec<String> {
        ["tool", "description"]
            .iter()
            .filter_map(|key| self.field(key).as_text())
            .map(|text| text.trim().to_lowercase())
            .collect()
    }
}

impl TableRow for Value {
    fn field(&self, key: &str) -> CellValue {
        self.get(key).map(CellValue::from).unwrap_or(CellValue::Missing)
    }
}

impl TableRow for Record {
    fn field(&self, key: &str) -> CellValue {
        match key {
            "tool" | "name" => CellValue::Text(self.tool.clone()),
            "categories" => CellValue::List(
                self.categories
                    .iter()
                    .map(|code| code.as_str().to_string())
                    .collect(),
            ),
            "link" => CellValue::from_optional(self.link.as_deref()),
            "description" => CellValue::from_optional(self.description.as_deref()),
            "API" => CellValue::Status(self.api.status),
            "API_note" => CellValue::from_optional(self.api.note.as_deref()),
            _ => section_field(&self.fields, key),
        }
    }

    fn categories(&self) -> Vec<CategoryCode> {
        self.categories.clone()
    }

    fn search_terms(&self) -> Vec<String> {
        vec![self.search.tool.clone(), self.search.description.clone()]
    }
}

fn flag_cell(flag: &Flag, note: bool) -> CellValue {
    if note {
        CellValue::from_optional(flag.note.as_deref())
    } else {
        CellValue::Status(flag.status)
    }
}

fn section_field(fields: &SectionFields, key: &str) -> CellValue {
    use SectionFields as F;

    let (name, note) = match key.strip_suffix("_note") {
        Some(base) => (base, true),
        None => (key, false),
    };
    match (fields, name) {
        (
            F::IndexedInternet { open_source, .. }
            | F::ArchivedWeb { open_source, .. }
            | F::DomainsIps { open_source, .. },
            "open_source",
        ) if !note => CellValue::Status(*open_source),
        (
            F::IndexedInternet {
                open_source_license,
                ..
            },
            "open_source_license",
        ) => CellValue::from_optional(open_source_license.as_deref()),
        (
            F::IndexedInternet { accessibility, .. }
            | F::ArchivedWeb { accessibility, .. }
            | F::DomainsIps { accessibility, .. },
            "accessibility",
        ) => flag_cell(accessibility, note),
        (F::NetworkDevices { services, .. }, "services") => flag_cell(services, note),
        (F::NetworkDevices { cve, .. }, "CVE") => flag_cell(cve, note),
        (
            F::NetworkDevices { maintained, .. }
            | F::Darknet { maintained }
            | F::SocialNetworks { maintained, .. }
            | F::DomainsIps { maintained, .. }
            | F::Mixed { maintained },
            "maintained",
        ) => flag_cell(maintained, note),
        (F::SocialNetworks { social_network, .. }, "social_network") if !note => {
            CellValue::Text(social_network.clone())
        }
        _ => CellValue::Missing,
    }
}

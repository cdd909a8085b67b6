//! Typed representation of a section document (`public/data/<section>.json`).
//!
//! Section files share a base record shape and add a handful of per-section
//! capability flags. The flags are modelled as a closed `SectionFields` union
//! so each section's table can be built without stringly-typed lookups. Use
//! `crate::validation` to obtain these types; `Record::from_value` assumes the
//! document already passed the section schema.

use crate::catalog::identity::{CategoryCode, SectionKind};
use crate::catalog::status::Status;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Display metadata for one declared category.
pub struct CategoryMeta {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Categories declared in a section's `meta.categories`, keyed by canonical code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryDictionary(BTreeMap<CategoryCode, CategoryMeta>);

impl CategoryDictionary {
    pub fn new(entries: BTreeMap<CategoryCode, CategoryMeta>) -> Self {
        Self(entries)
    }

    pub fn get(&self, code: &CategoryCode) -> Option<&CategoryMeta> {
        self.0.get(code)
    }

    pub fn contains(&self, code: &CategoryCode) -> bool {
        self.0.contains_key(code)
    }

    /// Declared codes in stable order.
    pub fn codes(&self) -> impl Iterator<Item = &CategoryCode> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CategoryCode, &CategoryMeta)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
/// A capability status with its optional free-text note.
pub struct Flag {
    pub status: Status,
    pub note: Option<String>,
}

impl Flag {
    pub fn new(status: Status, note: Option<String>) -> Self {
        Self { status, note }
    }
}

/// Lower-cased copies of the searchable fields. Never displayed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchIndex {
    pub tool: String,
    pub description: String,
}

impl SearchIndex {
    pub fn derive(tool: &str, description: Option<&str>) -> Self {
        Self {
            tool: tool.trim().to_lowercase(),
            description: description.unwrap_or_default().trim().to_lowercase(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// One cataloged tool.
pub struct Record {
    pub tool: String,
    pub categories: Vec<CategoryCode>,
    pub link: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "API")]
    pub api: Flag,
    #[serde(flatten)]
    pub fields: SectionFields,
    #[serde(skip)]
    pub search: SearchIndex,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
/// Section-specific columns, one variant per section shape.
pub enum SectionFields {
    IndexedInternet {
        open_source: Status,
        open_source_license: Option<String>,
        accessibility: Flag,
    },
    ArchivedWeb {
        open_source: Status,
        accessibility: Flag,
    },
    NetworkDevices {
        services: Flag,
        #[serde(rename = "CVE")]
        cve: Flag,
        maintained: Flag,
    },
    Darknet {
        maintained: Flag,
    },
    SocialNetworks {
        social_network: String,
        maintained: Flag,
    },
    SearchEngines,
    DomainsIps {
        open_source: Status,
        accessibility: Flag,
        maintained: Flag,
    },
    Mixed {
        maintained: Flag,
    },
}

impl SectionFields {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionFields::IndexedInternet { .. } => SectionKind::IndexedInternet,
            SectionFields::ArchivedWeb { .. } => SectionKind::ArchivedWeb,
            SectionFields::NetworkDevices { .. } => SectionKind::NetworkDevices,
            SectionFields::Darknet { .. } => SectionKind::Darknet,
            SectionFields::SocialNetworks { .. } => SectionKind::SocialNetworks,
            SectionFields::SearchEngines => SectionKind::SearchEngines,
            SectionFields::DomainsIps { .. } => SectionKind::DomainsIps,
            SectionFields::Mixed { .. } => SectionKind::Mixed,
        }
    }

    fn from_raw(kind: SectionKind, raw: RawFields) -> Self {
        let maintained = Flag::new(raw.maintained, raw.maintained_note);
        match kind {
            SectionKind::IndexedInternet => SectionFields::IndexedInternet {
                open_source: raw.open_source,
                open_source_license: raw.open_source_license,
                accessibility: Flag::new(raw.accessibility, raw.accessibility_note),
            },
            SectionKind::ArchivedWeb => SectionFields::ArchivedWeb {
                open_source: raw.open_source,
                accessibility: Flag::new(raw.accessibility, raw.accessibility_note),
            },
            SectionKind::NetworkDevices => SectionFields::NetworkDevices {
                services: Flag::new(raw.services, raw.services_note),
                cve: Flag::new(raw.cve, raw.cve_note),
                maintained,
            },
            SectionKind::Darknet => SectionFields::Darknet { maintained },
            SectionKind::SocialNetworks => SectionFields::SocialNetworks {
                social_network: raw.social_network.unwrap_or_default(),
                maintained,
            },
            SectionKind::SearchEngines => SectionFields::SearchEngines,
            SectionKind::DomainsIps => SectionFields::DomainsIps {
                open_source: raw.open_source,
                accessibility: Flag::new(raw.accessibility, raw.accessibility_note),
                maintained,
            },
            SectionKind::Mixed => SectionFields::Mixed { maintained },
        }
    }
}

// Serde view of a record as written on disk. Section-specific keys are all
// optional here; the section schema decides which are required.
#[derive(Deserialize)]
struct RawRecord {
    tool: String,
    #[serde(default)]
    categories: Vec<CategoryCode>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "API", default)]
    api: Status,
    #[serde(rename = "API_note", default)]
    api_note: Option<String>,
    #[serde(flatten)]
    fields: RawFields,
}

#[derive(Deserialize, Default)]
struct RawFields {
    #[serde(default)]
    open_source: Status,
    #[serde(default)]
    open_source_license: Option<String>,
    #[serde(default)]
    accessibility: Status,
    #[serde(default)]
    accessibility_note: Option<String>,
    #[serde(default)]
    services: Status,
    #[serde(default)]
    services_note: Option<String>,
    #[serde(rename = "CVE", default)]
    cve: Status,
    #[serde(rename = "CVE_note", default)]
    cve_note: Option<String>,
    #[serde(default)]
    maintained: Status,
    #[serde(default)]
    maintained_note: Option<String>,
    #[serde(default)]
    social_network: Option<String>,
}

impl Record {
    /// Build a record of the given section shape from its raw JSON object.
    pub fn from_value(kind: SectionKind, value: &Value) -> Result<Self> {
        let raw = RawRecord::deserialize(value)
            .with_context(|| format!("decoding {} record", kind.as_str()))?;
        let search = SearchIndex::derive(&raw.tool, raw.description.as_deref());
        Ok(Self {
            tool: raw.tool,
            categories: raw.categories,
            link: raw.link,
            description: raw.description,
            api: Flag::new(raw.api, raw.api_note),
            fields: SectionFields::from_raw(kind, raw.fields),
            search,
        })
    }

    pub fn kind(&self) -> SectionKind {
        self.fields.kind()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
/// A validated section: its category dictionary plus records in source order.
pub struct Section {
    pub kind: SectionKind,
    pub categories: CategoryDictionary,
    pub records: Vec<Record>,
}

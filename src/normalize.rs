//! Record normalization.
//!
//! `normalize` is pure and idempotent: it trims text, turns blank optional
//! text into `None`, strips trailing slashes from links, canonicalizes and
//! deduplicates category codes, and recomputes the search index.

use crate::catalog::{CategoryCode, Flag, Record, SearchIndex, Section, SectionFields};

pub fn normalize(record: &Record) -> Record {
    let tool = record.tool.trim().to_string();
    let description = clean_optional(record.description.as_deref());
    let search = SearchIndex::derive(&tool, description.as_deref());
    Record {
        categories: normalize_categories(&record.categories),
        link: normalize_link(record.link.as_deref()),
        api: normalize_flag(&record.api),
        fields: normalize_fields(&record.fields),
        tool,
        description,
        search,
    }
}

/// Normalize every record of a section, keeping source order.
pub fn normalize_section(section: &Section) -> Section {
    Section {
        kind: section.kind,
        categories: section.categories.clone(),
        records: section.records.iter().map(normalize).collect(),
    }
}

/// Trim a link and strip trailing slashes; blank links become `None`.
pub fn normalize_link(link: Option<&str>) -> Option<String> {
    let trimmed = link?.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn clean_optional(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_categories(categories: &[CategoryCode]) -> Vec<CategoryCode> {
    let mut out: Vec<CategoryCode> = Vec::with_capacity(categories.len());
    for code in categories {
        let code = CategoryCode::new(code.as_str());
        if !code.as_str().is_empty() && !out.contains(&code) {
            out.push(code);
        }
    }
    out
}

fn normalize_flag(flag: &Flag) -> Flag {
    Flag::new(flag.status, clean_optional(flag.note.as_deref()))
}

fn normalize_fields(fields: &SectionFields) -> SectionFields {
    match fields {
        SectionFields::IndexedInternet {
            open_source,
            open_source_license,
            accessibility,
        } => SectionFields::IndexedInternet {
            open_source: *open_source,
            open_source_license: clean_optional(open_source_license.as_deref()),
            accessibility: normalize_flag(accessibility),
        },
        SectionFields::ArchivedWeb {
            open_source,
            accessibility,
        } => SectionFields::ArchivedWeb {
            open_source: *open_source,
            accessibility: normalize_flag(accessibility),
        },
        SectionFields::NetworkDevices {
            services,
            cve,
            maintained,
        } => SectionFields::NetworkDevices {
            services: normalize_flag(services),
            cve: normalize_flag(cve),
            maintained: normalize_flag(maintained),
        },
        SectionFields::Darknet { maintained } => SectionFields::Darknet {
            maintained: normalize_flag(maintained),
        },
        SectionFields::SocialNetworks {
            social_network,
            maintained,
        } => SectionFields::SocialNetworks {
            social_network: social_network.trim().to_string(),
            maintained: normalize_flag(maintained),
        },
        SectionFields::SearchEngines => SectionFields::SearchEngines,
        SectionFields::DomainsIps {
            open_source,
            accessibility,
            maintained,
        } => SectionFields::DomainsIps {
            open_source: *open_source,
            accessibility: normalize_flag(accessibility),
            maintained: normalize_flag(maintained),
        },
        SectionFields::Mixed { maintained } => SectionFields::Mixed {
            maintained: normalize_flag(maintained),
        },
    }
}

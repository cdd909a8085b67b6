use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One of the dataset sections shipped under `public/data/`.
///
/// The set is closed: each variant owns a record shape in the section schema,
/// and unknown section names are rejected instead of passed through.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SectionKind {
    IndexedInternet,
    ArchivedWeb,
    NetworkDevices,
    Darknet,
    SocialNetworks,
    SearchEngines,
    DomainsIps,
    Mixed,
}

impl SectionKind {
    /// Every section in the order the validator walks them.
    pub const ALL: [SectionKind; 8] = [
        SectionKind::IndexedInternet,
        SectionKind::ArchivedWeb,
        SectionKind::NetworkDevices,
        SectionKind::Darknet,
        SectionKind::SocialNetworks,
        SectionKind::SearchEngines,
        SectionKind::DomainsIps,
        SectionKind::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::IndexedInternet => "indexed_internet",
            SectionKind::ArchivedWeb => "archived_web",
            SectionKind::NetworkDevices => "network_devices",
            SectionKind::Darknet => "darknet",
            SectionKind::SocialNetworks => "social_networks",
            SectionKind::SearchEngines => "search_engines",
            SectionKind::DomainsIps => "domains_ips",
            SectionKind::Mixed => "mixed",
        }
    }

    /// Parse a section name. Dashes are accepted in place of underscores so
    /// route-style names (`archived-web`) resolve too.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }

    /// File name of the section document relative to the data directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Human-facing title used by table headers and reports.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::IndexedInternet => "Indexed Internet Sources",
            SectionKind::ArchivedWeb => "Archived Web",
            SectionKind::NetworkDevices => "Network Devices",
            SectionKind::Darknet => "Dark Web",
            SectionKind::SocialNetworks => "Social Networks",
            SectionKind::SearchEngines => "Search Engines",
            SectionKind::DomainsIps => "Domains & IPs",
            SectionKind::Mixed => "Mixed",
        }
    }

    /// Name of the record definition inside the section schema.
    pub(crate) fn record_definition(&self) -> String {
        format!("{}_record", self.as_str())
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SectionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SectionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        SectionKind::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown section '{value}'")))
    }
}

/// Category code tagging a record within its section.
///
/// Codes compare case-insensitively: the stored form is lower-case and the
/// display form is upper-case, so `display()` and `new()` invert each other.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CategoryCode(String);

impl CategoryCode {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-case form shown in tags and filter pickers.
    pub fn display(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryCode {
    fn from(value: &str) -> Self {
        CategoryCode::new(value)
    }
}

impl Serialize for CategoryCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CategoryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(CategoryCode::new(&value))
    }
}

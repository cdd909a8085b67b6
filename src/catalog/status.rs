//! Canonical four-valued capability status.
//!
//! Section files have used booleans, nulls and `yes/no/partial/unknown`
//! strings for the same flags across revisions. Everything is coerced into
//! `Status` at the model boundary; nothing downstream sees the raw forms.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Status {
    Yes,
    No,
    Partial,
    #[default]
    Unknown,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Yes, Status::Partial, Status::No, Status::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Yes => "yes",
            Status::No => "no",
            Status::Partial => "partial",
            Status::Unknown => "unknown",
        }
    }

    /// Strict parse of a status name, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "yes" => Some(Status::Yes),
            "no" => Some(Status::No),
            "partial" => Some(Status::Partial),
            "unknown" => Some(Status::Unknown),
            _ => None,
        }
    }

    /// Lenient coercion of a string; unrecognized values become `Unknown`.
    pub fn coerce_str(raw: &str) -> Self {
        Status::parse(raw).unwrap_or(Status::Unknown)
    }

    pub fn from_bool(value: bool) -> Self {
        if value { Status::Yes } else { Status::No }
    }

    /// Coerce any raw JSON value: booleans map to yes/no, strings are parsed,
    /// everything else (null, numbers, containers) is `Unknown`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(flag) => Status::from_bool(*flag),
            Value::String(raw) => Status::coerce_str(raw),
            _ => Status::Unknown,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Status::from_value(&value))
    }
}

//! Schema entries and their ULID-based identity

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

const ID_PREFIX: &str = "SCH";

/// Stable identifier for one registry entry
///
/// Selection is keyed by this id, never by the schema value, so two entries
/// holding identical schemas stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Ulid);

impl EntryId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse an EntryId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", ID_PREFIX, self.0)
    }
}

impl FromStr for EntryId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        if !prefix.eq_ignore_ascii_case(ID_PREFIX) {
            return Err(IdParseError::InvalidPrefix(prefix.to_string()));
        }

        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok(Self(ulid))
    }
}

impl Serialize for EntryId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing entry IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid entry prefix: '{0}' (expected SCH)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in entry ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),
}

/// One named JSON Schema document held by the registry
///
/// `name` is the source filename and is not required to be unique. `schema`
/// is kept as an opaque JSON value; it is only interpreted when a form is
/// built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub id: EntryId,
    pub name: String,
    pub schema: Value,
}

impl SchemaEntry {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            schema,
        }
    }

    /// The schema's `title`, if it declares one
    pub fn title(&self) -> Option<&str> {
        self.schema.get("title").and_then(|t| t.as_str())
    }

    /// The schema's `description`, if it declares one
    pub fn description(&self) -> Option<&str> {
        self.schema.get("description").and_then(|d| d.as_str())
    }
}

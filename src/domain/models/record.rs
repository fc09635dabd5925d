//! Store-agnostic record model.
//!
//! Records live in one of three collections and carry a small set of typed
//! properties. The Notion adapter maps these onto Notion property objects;
//! the in-memory adapter stores them as-is.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Property names shared by the Issues, Users and Projects databases.
pub mod property {
    /// Title property of every record.
    pub const NAME: &str = "Name";
    /// URL property, used as the de-facto unique key.
    pub const URL: &str = "URL";
    /// Issue body.
    pub const DESCRIPTION: &str = "Description";
    /// Issue -> User relation.
    pub const USER: &str = "User";
    /// Issue -> Project relation.
    pub const PROJECT: &str = "Project";
    /// Issue -> Issue relation, set after creation.
    pub const SELF_REFERENCE: &str = "Self Reference";
}

/// Opaque identifier of a stored record (a Notion page id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three logical collections the pipeline writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Mirrored GitHub issues.
    Issues,
    /// GitHub users that reported issues.
    Users,
    /// Source repositories.
    Projects,
}

impl Collection {
    /// Lowercase name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issues => "issues",
            Self::Users => "users",
            Self::Projects => "projects",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// The record title.
    Title(String),
    /// A URL.
    Url(String),
    /// Free-form text.
    RichText(String),
    /// References to other records.
    Relation(Vec<PageId>),
}

impl PropertyValue {
    /// Text content of a title, url or rich-text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Title(s) | Self::Url(s) | Self::RichText(s) => Some(s),
            Self::Relation(_) => None,
        }
    }

    /// Related ids of a relation value.
    pub fn as_relation(&self) -> Option<&[PageId]> {
        match self {
            Self::Relation(ids) => Some(ids),
            _ => None,
        }
    }
}

/// Named properties of a record, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordProperties(BTreeMap<String, PropertyValue>);

impl RecordProperties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// Merge `other` into `self`, replacing properties with the same name.
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convenience accessor for the `URL` property.
    pub fn url(&self) -> Option<&str> {
        self.get(property::URL).and_then(PropertyValue::as_text)
    }
}

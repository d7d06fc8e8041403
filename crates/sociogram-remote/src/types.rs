//! Wire types for the platform's administrative API, plus the schema-side
//! spec structs callers use to describe what should exist remotely.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Connection settings for the platform, passed in explicitly.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the platform API, e.g. `https://cloud.example.com/v1`.
    pub endpoint: String,
    /// Project identifier, sent as the `X-Project-Id` header.
    pub project_id: String,
    /// Administrative API key, sent as the `X-Api-Key` header.
    pub api_key: String,
    /// Database identifier all collection/document calls are scoped to.
    pub database_id: String,
}

/// A schema-bearing grouping of documents, analogous to a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
}

/// Lifecycle of a remotely-created attribute. The platform creates
/// attributes asynchronously; an attribute is only usable by indexes and
/// relationships once it reports `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeStatus {
    Processing,
    Available,
    Failed,
    #[serde(other)]
    Unknown,
}

/// An attribute as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub status: AttributeStatus,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub array: bool,
}

/// Semantic attribute type. Text sizes are maximum lengths in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Short free text (names, identifiers).
    Text { size: u32 },
    /// Long free text (bios, captions).
    LongText { size: u32 },
    /// Platform-validated email address.
    Email,
    /// Multiple short-text values per document.
    TextArray { size: u32 },
}

/// Declaration of an attribute to create on a collection.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    pub key: String,
    pub kind: AttributeKind,
    pub required: bool,
    pub default: Option<String>,
}

impl AttributeSpec {
    pub fn text(key: &str, size: u32) -> Self {
        Self::new(key, AttributeKind::Text { size })
    }

    pub fn long_text(key: &str, size: u32) -> Self {
        Self::new(key, AttributeKind::LongText { size })
    }

    pub fn email(key: &str) -> Self {
        Self::new(key, AttributeKind::Email)
    }

    pub fn text_array(key: &str, size: u32) -> Self {
        Self::new(key, AttributeKind::TextArray { size })
    }

    fn new(key: &str, kind: AttributeKind) -> Self {
        Self {
            key: key.to_string(),
            kind,
            required: false,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }
}

/// Index flavor supported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    Key,
    Unique,
    Fulltext,
}

/// Declaration of a secondary index to create on a collection.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub key: String,
    pub kind: IndexKind,
    pub fields: Vec<String>,
}

impl IndexSpec {
    pub fn new(key: &str, kind: IndexKind, fields: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            kind,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// What happens to dependent documents when the referenced parent is
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OnDelete {
    Cascade,
    SetNull,
}

/// Declaration of a two-way many-to-one relationship link, owned by the
/// collection it is created on. Many documents of the related collection
/// reference one document of the owning collection.
#[derive(Debug, Clone)]
pub struct RelationshipSpec {
    /// Collection on the "many" side of the link.
    pub related_collection_id: String,
    /// Field created on the owning collection.
    pub field: String,
    /// Inverse field created on the related collection.
    pub inverse_field: String,
    pub on_delete: OnDelete,
}

/// A stored document: platform-assigned id plus free-form payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

/// Free-form per-account preferences, written by the client apps and only
/// ever read here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPrefs {
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// A platform-native account record (source of truth for sync).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub prefs: AccountPrefs,
}

/// One page of the account listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountPage {
    pub total: u64,
    pub accounts: Vec<Account>,
}

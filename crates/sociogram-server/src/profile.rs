//! The profile document stored in the "users" collection, and its
//! mapping from platform accounts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sociogram_remote::{Account, Document};

/// Base URL for generated avatars; the account id is appended as the seed.
const AVATAR_URL: &str = "https://api.dicebear.com/9.x/initials/svg?seed=";

/// Display name used when the account has none.
const DEFAULT_NAME: &str = "User";

/// A profile document. One exists per distinct `accountId`; uniqueness is
/// enforced by query-before-insert in the sync loop, not by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub account_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

impl Profile {
    /// Build a fresh profile from a platform account.
    pub fn from_account(account: &Account) -> Self {
        let name = account
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty());

        let avatar = account
            .prefs
            .avatar
            .as_deref()
            .filter(|url| !url.is_empty());

        Self {
            account_id: account.id.clone(),
            name: name.unwrap_or(DEFAULT_NAME).to_string(),
            username: derive_username(name, &account.id),
            email: account.email.clone(),
            image_url: avatar
                .map(str::to_string)
                .unwrap_or_else(|| fallback_avatar_url(&account.id)),
            bio: account.prefs.bio.clone().filter(|bio| !bio.is_empty()),
            image_id: None,
        }
    }

    /// Decode a stored profile document.
    pub fn from_document(document: &Document) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(document.data.clone()))
    }

    /// Payload for creating the backing document.
    pub fn to_document_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("accountId".to_string(), self.account_id.clone().into());
        data.insert("name".to_string(), self.name.clone().into());
        data.insert("username".to_string(), self.username.clone().into());
        data.insert("email".to_string(), self.email.clone().into());
        data.insert("imageUrl".to_string(), self.image_url.clone().into());
        if let Some(bio) = &self.bio {
            data.insert("bio".to_string(), bio.clone().into());
        }
        if let Some(image_id) = &self.image_id {
            data.insert("imageId".to_string(), image_id.clone().into());
        }
        data
    }
}

/// Derive a username: the lower-cased name with whitespace runs collapsed
/// to single underscores, or `user_` plus the first 7 characters of the
/// account id when no name is set.
fn derive_username(name: Option<&str>, account_id: &str) -> String {
    match name {
        Some(name) => name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase(),
        None => format!("user_{}", account_id.chars().take(7).collect::<String>()),
    }
}

/// Generated avatar URL, seeded by the account id.
fn fallback_avatar_url(account_id: &str) -> String {
    format!("{AVATAR_URL}{account_id}")
}

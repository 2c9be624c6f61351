//! Search result model

use serde::{Deserialize, Serialize};

use super::{Embedded, Identified, Post, User};

/// A profile suggestion returned by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    /// Unique id
    pub id: String,
    /// Display name
    pub name: String,
    /// Bio line
    pub content: String,
    /// Avatar URL
    pub profile_image_url: String,
    /// Follower count
    #[serde(default)]
    pub followers: u32,
    /// Whether the user already follows them
    #[serde(default)]
    pub is_followed: bool,
    /// Whether they are a connection
    #[serde(default)]
    pub is_connections: bool,
    /// Verified badge
    #[serde(default)]
    pub is_verified: bool,
    /// Owning user id
    pub user_id: String,
    /// Related post, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
}

impl SearchEntry {
    /// Case-insensitive substring match on name or content.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

impl Identified for SearchEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A search entry as served: its owner, plus the related post and that
/// post's owner when the entry points at one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The entry itself
    #[serde(flatten)]
    pub item: SearchEntry,
    /// Owner of the entry
    pub user: User,
    /// Related post, `null` when the entry has none
    #[serde(default)]
    pub post: Option<Embedded<Post>>,
}

impl Identified for SearchResult {
    fn id(&self) -> &str {
        &self.item.id
    }
}

impl AsRef<SearchEntry> for SearchResult {
    fn as_ref(&self) -> &SearchEntry {
        &self.item
    }
}

impl std::ops::Deref for SearchResult {
    type Target = SearchEntry;

    fn deref(&self) -> &SearchEntry {
        &self.item
    }
}

//! Post model and the composer's thread record

use serde::{Deserialize, Serialize};

use super::Identified;

/// Geographic position attached to a post, serialized as `[lat, lon]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location(pub [f64; 2]);

impl Location {
    /// Latitude in degrees
    pub const fn latitude(&self) -> f64 {
        self.0[0]
    }

    /// Longitude in degrees
    pub const fn longitude(&self) -> f64 {
        self.0[1]
    }
}

/// A post in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Numeric string id; larger means more recent
    pub id: String,
    /// Post body
    pub content: String,
    /// Attached image URLs, in display order
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Optional location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Like count
    #[serde(default)]
    pub likes: u32,
    /// Comment count
    #[serde(default)]
    pub comments: u32,
    /// Repost count
    #[serde(default)]
    pub reposts: u32,
    /// Author id
    pub user_id: String,
}

impl Post {
    /// Create an empty post owned by `user_id`
    pub fn new(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            image_urls: Vec::new(),
            location: None,
            likes: 0,
            comments: 0,
            reposts: 0,
            user_id: user_id.into(),
        }
    }

    /// Id as a number. Non-numeric ids, and ids too large for a `u64`,
    /// count as 0.
    pub fn numeric_id(&self) -> u64 {
        self.id.parse().unwrap_or(0)
    }

    /// Ordering key for recency. All-digit ids of any length compare as
    /// numbers; anything else sorts below every numeric id.
    fn recency_key(&self) -> Option<(usize, &str)> {
        if self.id.is_empty() || !self.id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = self.id.trim_start_matches('0');
        Some((digits.len(), digits))
    }

    /// Get a short preview of the content (for list display)
    pub fn preview(&self, max_len: usize) -> String {
        let content = self.content.replace('\n', " ");
        if content.chars().count() <= max_len {
            content
        } else {
            let cut: String = content.chars().take(max_len.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }

    /// Stable sort, most recent first (numeric id descending)
    pub fn sort_recent_first<P: AsRef<Self>>(posts: &mut [P]) {
        posts.sort_by(|a, b| b.as_ref().recency_key().cmp(&a.as_ref().recency_key()));
    }
}

impl AsRef<Post> for Post {
    fn as_ref(&self) -> &Post {
        self
    }
}

impl Identified for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One segment of a composed thread, as submitted through `POST /posts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPost {
    /// Client-chosen id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Body text
    #[serde(default)]
    pub content: String,
    /// Author id as sent by the composer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Attachment URIs, ordered by their form index
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Parsed location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

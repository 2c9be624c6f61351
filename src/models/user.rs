//! User profile model

use serde::{Deserialize, Serialize};

use super::Identified;

/// A user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique handle (without the leading `@`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Short bio
    pub description: String,
    /// Avatar URL
    pub profile_image_url: String,
    /// Whether the account carries a verified badge
    #[serde(default)]
    pub is_verified: bool,
}

impl User {
    /// Create a user with an empty profile
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            profile_image_url: String::new(),
            is_verified: false,
        }
    }

    /// Handle as shown in the UI and used in profile routes
    pub fn handle(&self) -> String {
        format!("@{}", self.id)
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

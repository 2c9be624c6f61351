//! Decoder for the composer's multipart submission
//!
//! The composer flattens its thread list into form fields named
//! `posts[<i>][<field>]`, with attachments under `posts[<i>][imageUrls][<j>]`.
//! Decoding regroups them by `i` (ascending) and orders images by `j`.
//! Names that do not follow the pattern are skipped.

use std::collections::BTreeMap;

use regex_lite::Regex;

use crate::error::{FixtureError, FixtureResult};
use crate::models::{Location, ThreadPost};

const FIELD_PATTERN: &str = r"^posts\[(\d+)\]\[(\w+)\](?:\[(\d+)\])?$";

/// Value of one form part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Plain text part
    Text(String),
    /// File part; only its name (the attachment URI) is kept
    File {
        /// Client-side file name or URI
        file_name: Option<String>,
    },
}

impl FormValue {
    /// Text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File { .. } => None,
        }
    }

    /// URI of an attachment. Text parts are taken verbatim.
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File { file_name, .. } => file_name.as_deref(),
        }
    }
}

/// One named form part, in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Part name
    pub name: String,
    /// Part value
    pub value: FormValue,
}

impl FormField {
    /// Text part
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    /// File part carrying only a URI
    pub fn file(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                file_name: Some(uri.into()),
            },
        }
    }
}

#[derive(Default)]
struct Draft {
    post: ThreadPost,
    images: BTreeMap<usize, String>,
}

/// Regroup form fields into thread records
pub fn decode_thread_posts(fields: &[FormField]) -> FixtureResult<Vec<ThreadPost>> {
    let pattern = Regex::new(FIELD_PATTERN).map_err(|e| FixtureError::InvalidBody(e.to_string()))?;
    let mut drafts: BTreeMap<usize, Draft> = BTreeMap::new();

    for field in fields {
        let Some(caps) = pattern.captures(&field.name) else {
            tracing::debug!(name = %field.name, "Skipping unrecognized form field");
            continue;
        };
        let Ok(index) = caps[1].parse::<usize>() else {
            continue;
        };
        let slot = caps.get(3).and_then(|m| m.as_str().parse::<usize>().ok());
        let draft = drafts.entry(index).or_default();

        match (&caps[2], slot) {
            ("imageUrls", Some(j)) => {
                if let Some(uri) = field.value.as_uri() {
                    draft.images.insert(j, uri.to_string());
                }
            }
            ("imageUrls", None) => {
                tracing::warn!(name = %field.name, "Image field without an index");
            }
            ("location", _) => {
                let Some(raw) = field.value.as_text() else {
                    continue;
                };
                let location: Location =
                    serde_json::from_str(raw).map_err(|e| FixtureError::InvalidLocation {
                        value: raw.to_string(),
                        reason: e.to_string(),
                    })?;
                draft.post.location = Some(location);
            }
            ("id", _) => draft.post.id = field.value.as_text().map(str::to_string),
            ("content", _) => {
                draft.post.content = field.value.as_text().unwrap_or_default().to_string();
            }
            ("userId", _) => draft.post.user_id = field.value.as_text().map(str::to_string),
            (other, _) => {
                tracing::debug!(field = other, "Ignoring unknown thread field");
            }
        }
    }

    Ok(drafts
        .into_values()
        .map(|draft| ThreadPost {
            image_urls: draft.images.into_values().collect(),
            ..draft.post
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_threads_with_images() {
        let fields = vec![
            FormField::text("posts[0][id]", "1700000000000"),
            FormField::text("posts[0][content]", "first"),
            FormField::text("posts[0][userId]", "user0"),
            FormField::file("posts[0][imageUrls][1]", "file:///b.jpg"),
            FormField::file("posts[0][imageUrls][0]", "file:///a.jpg"),
            FormField::text("posts[0][location]", "[37.5665, 126.978]"),
            FormField::text("posts[1][id]", "1700000000001"),
            FormField::text("posts[1][content]", "second"),
        ];

        let posts = decode_thread_posts(&fields).unwrap();
        assert_eq!(posts.len(), 2);

        assert_eq!(posts[0].id.as_deref(), Some("1700000000000"));
        assert_eq!(posts[0].content, "first");
        assert_eq!(posts[0].user_id.as_deref(), Some("user0"));
        assert_eq!(posts[0].image_urls, ["file:///a.jpg", "file:///b.jpg"]);
        let location = posts[0].location.unwrap();
        assert!((location.latitude() - 37.5665).abs() < f64::EPSILON);
        assert!((location.longitude() - 126.978).abs() < f64::EPSILON);

        assert_eq!(posts[1].content, "second");
        assert!(posts[1].image_urls.is_empty());
        assert!(posts[1].location.is_none());
    }

    #[test]
    fn test_index_order_not_submission_order() {
        let fields = vec![
            FormField::text("posts[2][content]", "c"),
            FormField::text("posts[0][content]", "a"),
            FormField::text("posts[10][content]", "d"),
        ];
        let contents: Vec<String> = decode_thread_posts(&fields)
            .unwrap()
            .into_iter()
            .map(|p| p.content)
            .collect();
        assert_eq!(contents, ["a", "c", "d"]);
    }

    #[test]
    fn test_malformed_names_are_ignored() {
        let fields = vec![
            FormField::text("post[0][content]", "typo"),
            FormField::text("posts[x][content]", "bad index"),
            FormField::text("posts[0]content", "missing brackets"),
            FormField::text("posts[0][imageUrls]", "no slot"),
            FormField::text("prefix posts[0][content]", "prefixed"),
            FormField::text("posts[0][content]", "kept"),
        ];
        let posts = decode_thread_posts(&fields).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "kept");
        assert!(posts[0].image_urls.is_empty());
    }

    #[test]
    fn test_text_image_values() {
        let fields = vec![FormField::text("posts[0][imageUrls][0]", "https://example.com/x.png")];
        let posts = decode_thread_posts(&fields).unwrap();
        assert_eq!(posts[0].image_urls, ["https://example.com/x.png"]);
    }

    #[test]
    fn test_bad_location() {
        for raw in ["not json", "[1]", "[1, 2, 3]", "{\"lat\": 1}"] {
            let fields = vec![FormField::text("posts[0][location]", raw)];
            let err = decode_thread_posts(&fields).unwrap_err();
            assert_eq!(err.status(), 400, "{raw}");
        }
    }

    #[test]
    fn test_empty_form() {
        assert!(decode_thread_posts(&[]).unwrap().is_empty());
    }
}

//! Data models for the fixture backend

mod activity;
mod post;
mod search;
mod user;

use serde::{Deserialize, Serialize};

pub use activity::{Activity, ActivityFilter, ActivityKind, TimeAgo};
pub use post::{Location, Post, ThreadPost};
pub use search::{SearchEntry, SearchResult};
pub use user::User;

/// Anything that can be addressed by a cursor
pub trait Identified {
    /// Opaque id, compared verbatim against cursors
    fn id(&self) -> &str;
}

impl<T: Identified + ?Sized> Identified for &T {
    fn id(&self) -> &str {
        (**self).id()
    }
}

/// An entity serialized together with its owning user
///
/// Every post, activity and search entry goes over the wire with the full
/// `user` object next to its own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedded<T> {
    /// The entity itself
    #[serde(flatten)]
    pub item: T,
    /// Its owner, resolved by id
    pub user: User,
}

impl<T: Identified> Identified for Embedded<T> {
    fn id(&self) -> &str {
        self.item.id()
    }
}

impl<T> AsRef<T> for Embedded<T> {
    fn as_ref(&self) -> &T {
        &self.item
    }
}

impl<T> std::ops::Deref for Embedded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

//! In-memory fixture store
//!
//! Holds users, posts, activities and search entries for one run. Every
//! non-user entity points at an existing user; inserts that break this or
//! reuse an id are rejected. Collections keep insertion order, which is the
//! order activities, search results and profile tabs are served in.

mod seed;

use std::collections::HashMap;

use crate::error::{FixtureError, FixtureResult};
use crate::models::{
    Activity, ActivityFilter, Embedded, Identified, Post, SearchEntry, SearchResult, User,
};
use crate::pagination::{ACTIVITY_PAGE_SIZE, PAGE_SIZE, page_after};

pub use seed::{Seeder, demo_user};

/// Entities that belong to a user
pub trait Owned {
    /// Owner id
    fn user_id(&self) -> &str;
}

impl Owned for Post {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for Activity {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for SearchEntry {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Home feed tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostFilter {
    /// Every post
    #[default]
    All,
    /// Only the demo user's posts
    Following,
}

impl PostFilter {
    /// Parse `?type=`. Anything but `following` means all posts.
    pub fn parse(s: &str) -> Self {
        match s {
            "following" => Self::Following,
            _ => Self::All,
        }
    }

    /// Value sent as `?type=`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Following => "following",
        }
    }
}

/// Profile tab under `/users/:id/:type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTab {
    /// Posts written by the user
    Threads,
    /// Posts written by anyone else
    Reposts,
    /// Unfiltered (e.g. `replies`)
    All,
}

impl ProfileTab {
    /// Parse the path segment
    pub fn parse(s: &str) -> Self {
        match s {
            "threads" => Self::Threads,
            "reposts" => Self::Reposts,
            _ => Self::All,
        }
    }

    /// Path segment; the unfiltered tab is `replies`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Threads => "threads",
            Self::Reposts => "reposts",
            Self::All => "replies",
        }
    }
}

/// The fixture database
#[derive(Debug, Clone)]
pub struct FixtureStore {
    demo_user_id: String,
    users: Vec<User>,
    user_index: HashMap<String, usize>,
    posts: Vec<Post>,
    activities: Vec<Activity>,
    search: Vec<SearchEntry>,
}

impl FixtureStore {
    /// Create a store holding only the demo user
    pub fn new(demo_user: User) -> Self {
        let demo_user_id = demo_user.id.clone();
        let user_index = HashMap::from([(demo_user_id.clone(), 0)]);
        Self {
            demo_user_id,
            users: vec![demo_user],
            user_index,
            posts: Vec::new(),
            activities: Vec::new(),
            search: Vec::new(),
        }
    }

    // ==================== Users ====================

    /// The account every created post is attributed to
    pub fn demo_user(&self) -> &User {
        &self.users[0]
    }

    /// Look up a user by id
    pub fn user(&self, id: &str) -> Option<&User> {
        self.user_index.get(id).map(|&i| &self.users[i])
    }

    /// All users, demo user first
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Add a user
    pub fn insert_user(&mut self, user: User) -> FixtureResult<()> {
        if self.user_index.contains_key(&user.id) {
            return Err(FixtureError::DuplicateId { kind: "user", id: user.id });
        }
        self.user_index.insert(user.id.clone(), self.users.len());
        self.users.push(user);
        Ok(())
    }

    fn check_owner(&self, user_id: &str) -> FixtureResult<()> {
        if self.user_index.contains_key(user_id) {
            Ok(())
        } else {
            Err(FixtureError::UnknownUser(user_id.to_string()))
        }
    }

    /// Attach the owning user to an entity
    pub fn embed<T: Owned + Clone>(&self, item: &T) -> FixtureResult<Embedded<T>> {
        let user = self
            .user(item.user_id())
            .ok_or_else(|| FixtureError::UnknownUser(item.user_id().to_string()))?;
        Ok(Embedded {
            item: item.clone(),
            user: user.clone(),
        })
    }

    /// Embed every item of a page
    pub fn embed_all<T: Owned + Clone>(&self, items: &[&T]) -> FixtureResult<Vec<Embedded<T>>> {
        items.iter().map(|item| self.embed(*item)).collect()
    }

    // ==================== Posts ====================

    /// Look up a post by id
    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// All posts in creation order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Add a post
    pub fn insert_post(&mut self, post: Post) -> FixtureResult<()> {
        self.check_owner(&post.user_id)?;
        if self.post(&post.id).is_some() {
            return Err(FixtureError::DuplicateId { kind: "post", id: post.id });
        }
        self.posts.push(post);
        Ok(())
    }

    /// One past the largest numeric post id, `None` once `u64::MAX` is taken
    pub fn next_post_id(&self) -> Option<u64> {
        self.posts.iter().map(Post::numeric_id).max().unwrap_or(0).checked_add(1)
    }

    /// Home feed page, newest first
    pub fn list_posts(&self, filter: PostFilter, cursor: Option<&str>) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| filter == PostFilter::All || p.user_id == self.demo_user_id)
            .collect();
        Post::sort_recent_first(&mut posts);
        page_after(&posts, cursor, PAGE_SIZE).to_vec()
    }

    /// Comment page for a post, newest first.
    ///
    /// There is no comment collection: every post stands in as a comment,
    /// whatever `post_id` is.
    pub fn list_comments(&self, _post_id: &str, cursor: Option<&str>) -> Vec<&Post> {
        self.list_posts(PostFilter::All, cursor)
    }

    /// Profile tab page, in creation order
    pub fn list_user_posts(&self, user_id: &str, tab: ProfileTab, cursor: Option<&str>) -> Vec<&Post> {
        let posts: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| match tab {
                ProfileTab::Threads => p.user_id == user_id,
                ProfileTab::Reposts => p.user_id != user_id,
                ProfileTab::All => true,
            })
            .collect();
        page_after(&posts, cursor, PAGE_SIZE).to_vec()
    }

    // ==================== Activities ====================

    /// All activities in creation order
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Add an activity
    pub fn insert_activity(&mut self, activity: Activity) -> FixtureResult<()> {
        self.check_owner(&activity.user_id)?;
        if self.activities.iter().any(|a| a.id == activity.id) {
            return Err(FixtureError::DuplicateId { kind: "activity", id: activity.id });
        }
        self.activities.push(activity);
        Ok(())
    }

    /// Activity tab page, in creation order
    pub fn list_activities(&self, filter: ActivityFilter, cursor: Option<&str>) -> Vec<&Activity> {
        let activities: Vec<&Activity> = self.activities.iter().filter(|a| filter.matches(a)).collect();
        page_after(&activities, cursor, ACTIVITY_PAGE_SIZE).to_vec()
    }

    // ==================== Search ====================

    /// All search entries in creation order
    pub fn search_entries(&self) -> &[SearchEntry] {
        &self.search
    }

    /// Add a search entry
    pub fn insert_search_entry(&mut self, entry: SearchEntry) -> FixtureResult<()> {
        self.check_owner(&entry.user_id)?;
        if self.search.iter().any(|e| e.id() == entry.id) {
            return Err(FixtureError::DuplicateId { kind: "search", id: entry.id });
        }
        self.search.push(entry);
        Ok(())
    }

    /// Search page. An empty or missing query matches everything.
    pub fn search(&self, query: Option<&str>, cursor: Option<&str>) -> Vec<&SearchEntry> {
        let needle = query.filter(|q| !q.is_empty()).map(str::to_lowercase);
        let results: Vec<&SearchEntry> = self
            .search
            .iter()
            .filter(|e| needle.as_deref().is_none_or(|n| e.matches(n)))
            .collect();
        page_after(&results, cursor, PAGE_SIZE).to_vec()
    }

    /// Embed a search entry with its owner and, when `post_id` resolves, the
    /// related post with its own owner. A dangling `post_id` serves `null`.
    pub fn embed_search(&self, entry: &SearchEntry) -> FixtureResult<SearchResult> {
        let Embedded { item, user } = self.embed(entry)?;
        let post = match item.post_id.as_deref().and_then(|id| self.post(id)) {
            Some(post) => Some(self.embed(post)?),
            None => None,
        };
        Ok(SearchResult { item, user, post })
    }

    /// Embed every entry of a search page
    pub fn embed_search_all(&self, entries: &[&SearchEntry]) -> FixtureResult<Vec<SearchResult>> {
        entries.iter().map(|entry| self.embed_search(entry)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityKind;

    fn store_with_users(ids: &[&str]) -> FixtureStore {
        let mut store = FixtureStore::new(demo_user("user0"));
        for id in ids {
            store.insert_user(User::new(*id, id.to_uppercase())).unwrap();
        }
        store
    }

    /// 15 posts with ids 1..=15; every third one belongs to user0.
    fn fifteen_posts() -> FixtureStore {
        let mut store = store_with_users(&["alice", "bob"]);
        for i in 1..=15 {
            let owner = match i % 3 {
                0 => "user0",
                1 => "alice",
                _ => "bob",
            };
            store.insert_post(Post::new(i.to_string(), owner)).unwrap();
        }
        store
    }

    fn ids<T: Identified>(items: &[&T]) -> Vec<String> {
        items.iter().map(|i| i.id().to_string()).collect()
    }

    #[test]
    fn test_following_feed() {
        let store = fifteen_posts();
        let page = store.list_posts(PostFilter::Following, None);
        assert_eq!(ids(&page), ["15", "12", "9", "6", "3"]);
        assert!(store.list_posts(PostFilter::Following, Some("3")).is_empty());
    }

    #[test]
    fn test_home_feed_pages_newest_first() {
        let store = fifteen_posts();
        let first = store.list_posts(PostFilter::All, None);
        assert_eq!(ids(&first), ["15", "14", "13", "12", "11", "10", "9", "8", "7", "6"]);

        let second = store.list_posts(PostFilter::All, Some("6"));
        assert_eq!(ids(&second), ["5", "4", "3", "2", "1"]);
        assert!(store.list_posts(PostFilter::All, Some("1")).is_empty());
    }

    #[test]
    fn test_unknown_cursor_restarts_feed() {
        // Preserved behavior: a stale cursor silently serves the first page.
        let store = fifteen_posts();
        assert_eq!(
            ids(&store.list_posts(PostFilter::All, Some("999"))),
            ids(&store.list_posts(PostFilter::All, None))
        );
    }

    #[test]
    fn test_numeric_sort_not_lexical() {
        let mut store = store_with_users(&[]);
        for id in ["9", "10", "100", "11"] {
            store.insert_post(Post::new(id, "user0")).unwrap();
        }
        assert_eq!(ids(&store.list_posts(PostFilter::All, None)), ["100", "11", "10", "9"]);
    }

    #[test]
    fn test_profile_tabs() {
        let store = fifteen_posts();
        let threads = store.list_user_posts("alice", ProfileTab::Threads, None);
        assert_eq!(ids(&threads), ["1", "4", "7", "10", "13"]);

        let reposts = store.list_user_posts("alice", ProfileTab::Reposts, None);
        assert_eq!(reposts.len(), 10);
        assert!(reposts.iter().all(|p| p.user_id != "alice"));

        let rest = store.list_user_posts("alice", ProfileTab::Reposts, Some(&reposts[9].id));
        assert!(rest.is_empty());

        let replies = store.list_user_posts("alice", ProfileTab::parse("replies"), None);
        assert_eq!(replies.len(), 10);
    }

    #[test]
    fn test_comments_use_post_collection() {
        let store = fifteen_posts();
        assert_eq!(
            ids(&store.list_comments("15", None)),
            ids(&store.list_posts(PostFilter::All, None))
        );
    }

    #[test]
    fn test_rejects_unknown_owner() {
        let mut store = store_with_users(&[]);
        let err = store.insert_post(Post::new("1", "ghost")).unwrap_err();
        assert!(matches!(err, FixtureError::UnknownUser(id) if id == "ghost"));
        assert!(store.posts().is_empty());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut store = store_with_users(&["alice"]);
        store.insert_post(Post::new("1", "alice")).unwrap();
        assert!(store.insert_post(Post::new("1", "user0")).is_err());
        assert!(store.insert_user(User::new("alice", "Again")).is_err());
    }

    #[test]
    fn test_next_post_id() {
        let store = fifteen_posts();
        assert_eq!(store.next_post_id(), Some(16));
        assert_eq!(store_with_users(&[]).next_post_id(), Some(1));

        let mut full = store_with_users(&[]);
        full.insert_post(Post::new(u64::MAX.to_string(), "user0")).unwrap();
        assert_eq!(full.next_post_id(), None);
    }

    #[test]
    fn test_activity_filters() {
        let mut store = store_with_users(&["alice"]);
        for (i, kind) in ActivityKind::all().iter().cycle().take(30).enumerate() {
            store
                .insert_activity(Activity::new(format!("a{i}"), *kind, "alice"))
                .unwrap();
        }

        let all = store.list_activities(ActivityFilter::All, None);
        assert_eq!(all.len(), 20);

        for filter in [
            ActivityFilter::Follows,
            ActivityFilter::Replies,
            ActivityFilter::Mentions,
            ActivityFilter::Quotes,
            ActivityFilter::Verified,
        ] {
            let page = store.list_activities(filter, None);
            assert!(!page.is_empty());
            assert!(page.iter().all(|a| Some(a.kind) == filter.kind()));
            assert!(page.iter().all(|a| store.activities().iter().any(|b| b.id == a.id)));
        }

        let unknown = store.list_activities(ActivityFilter::parse("likes"), None);
        assert_eq!(ids(&unknown), ids(&all));
    }

    #[test]
    fn test_search_case_insensitive() {
        let mut store = store_with_users(&["alice"]);
        for (id, name, content) in [
            ("s1", "John Doe", "hello"),
            ("s2", "Jane Roe", "likes DOES and don'ts"),
            ("s3", "Max Power", "nothing here"),
        ] {
            store
                .insert_search_entry(SearchEntry {
                    id: id.to_string(),
                    name: name.to_string(),
                    content: content.to_string(),
                    profile_image_url: String::new(),
                    followers: 0,
                    is_followed: false,
                    is_connections: false,
                    is_verified: false,
                    user_id: "alice".to_string(),
                    post_id: None,
                })
                .unwrap();
        }

        assert_eq!(ids(&store.search(Some("doe"), None)), ["s1", "s2"]);
        assert_eq!(ids(&store.search(Some("DOE"), None)), ["s1", "s2"]);
        assert_eq!(ids(&store.search(Some(""), None)).len(), 3);
        assert_eq!(ids(&store.search(None, Some("s1"))), ["s2", "s3"]);
        assert!(store.search(Some("zzz"), None).is_empty());
    }

    #[test]
    fn test_search_embeds_related_post() {
        let mut store = fifteen_posts();
        for (id, post_id) in [("s1", Some("3")), ("s2", None), ("s3", Some("404"))] {
            store
                .insert_search_entry(SearchEntry {
                    id: id.to_string(),
                    name: "Alice".to_string(),
                    content: String::new(),
                    profile_image_url: String::new(),
                    followers: 0,
                    is_followed: false,
                    is_connections: false,
                    is_verified: false,
                    user_id: "alice".to_string(),
                    post_id: post_id.map(str::to_string),
                })
                .unwrap();
        }

        let page = store.search(None, None);
        let results = store.embed_search_all(&page).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].user.id, "alice");
        let post = results[0].post.as_ref().unwrap();
        assert_eq!(post.id, "3");
        assert_eq!(post.user.id, "user0");
        assert!(results[1].post.is_none());
        assert!(results[2].post.is_none());
    }

    #[test]
    fn test_embed_attaches_owner() {
        let store = fifteen_posts();
        let post = store.post("3").unwrap();
        let embedded = store.embed(post).unwrap();
        assert_eq!(embedded.user.id, "user0");
        assert_eq!(embedded.id, "3");
    }
}

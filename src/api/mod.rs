//! Client for the fixture server
//!
//! [`FixtureClient`] wraps the HTTP endpoints; the feed types below adapt it
//! to [`PageSource`] so a [`Feed`](crate::feed::Feed) can scroll through
//! them.

mod client;

pub use client::FixtureClient;

use anyhow::Result;

use crate::feed::PageSource;
use crate::models::{Activity, ActivityFilter, Embedded, Post, SearchResult};
use crate::store::PostFilter;

/// Home feed tab
pub struct PostFeed<'a> {
    client: &'a FixtureClient,
    filter: PostFilter,
}

impl<'a> PostFeed<'a> {
    /// Page through `/posts` with `filter`
    pub const fn new(client: &'a FixtureClient, filter: PostFilter) -> Self {
        Self { client, filter }
    }
}

impl PageSource for PostFeed<'_> {
    type Item = Embedded<Post>;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Vec<Self::Item>> {
        self.client.posts(self.filter, cursor).await
    }
}

/// Search results for one query
pub struct SearchFeed<'a> {
    client: &'a FixtureClient,
    query: String,
}

impl<'a> SearchFeed<'a> {
    /// Page through `/search?q=query`
    pub fn new(client: &'a FixtureClient, query: impl Into<String>) -> Self {
        Self {
            client,
            query: query.into(),
        }
    }
}

impl PageSource for SearchFeed<'_> {
    type Item = SearchResult;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Vec<Self::Item>> {
        self.client.search(&self.query, cursor).await
    }
}

/// Activity tab
pub struct ActivityFeed<'a> {
    client: &'a FixtureClient,
    filter: ActivityFilter,
}

impl<'a> ActivityFeed<'a> {
    /// Page through `/activities` with `filter`
    pub const fn new(client: &'a FixtureClient, filter: ActivityFilter) -> Self {
        Self { client, filter }
    }
}

impl PageSource for ActivityFeed<'_> {
    type Item = Embedded<Activity>;

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Vec<Self::Item>> {
        self.client.activities(self.filter, cursor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feed::Feed;
    use crate::router::FixtureApi;
    use crate::server;

    async fn seeded_client() -> FixtureClient {
        let mut config = Config::default();
        config.server.upload_delay_ms = 0;
        config.server.bind = "127.0.0.1:0".to_string();
        let api = FixtureApi::from_config(&config).unwrap();
        let addr = server::spawn(api, &config.server).await.unwrap();
        FixtureClient::new(&format!("http://{addr}"))
    }

    #[tokio::test]
    async fn test_scroll_home_feed_to_end() {
        let client = seeded_client().await;
        let mut feed = Feed::new();
        feed.load_up_to(&PostFeed::new(&client, PostFilter::All), usize::MAX)
            .await
            .unwrap();

        // 10 users plus the demo user, 5 posts each
        assert_eq!(feed.items().len(), 55);
        assert!(feed.is_exhausted());
        let ids: Vec<u64> = feed.items().iter().map(|p| p.numeric_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_scroll_activities() {
        let client = seeded_client().await;
        let source = ActivityFeed::new(&client, ActivityFilter::All);
        let mut feed = Feed::new();
        assert_eq!(feed.load_more(&source).await.unwrap(), 20);
        assert_eq!(feed.load_more(&source).await.unwrap(), 20);

        let mentions = ActivityFeed::new(&client, ActivityFilter::Mentions);
        let mut filtered = Feed::new();
        filtered.load_up_to(&mentions, usize::MAX).await.unwrap();
        assert!(filtered.items().iter().all(|a| ActivityFilter::Mentions.matches(a)));
    }

    #[tokio::test]
    async fn test_search_feed_matches_query() {
        let client = seeded_client().await;
        let everything = SearchFeed::new(&client, "");
        let mut feed = Feed::new();
        feed.load_up_to(&everything, usize::MAX).await.unwrap();
        assert_eq!(feed.items().len(), 20);
        for entry in feed.items() {
            assert_eq!(entry.post.as_ref().map(|p| p.id.as_str()), entry.post_id.as_deref());
        }

        let needle = feed.items()[0].name.to_lowercase();
        let mut narrowed = Feed::new();
        narrowed
            .load_up_to(&SearchFeed::new(&client, needle.to_uppercase()), usize::MAX)
            .await
            .unwrap();
        assert!(!narrowed.items().is_empty());
        assert!(narrowed.items().iter().all(|e| e.matches(&needle)));
    }
}

//! Deterministic fixture generation

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use uuid::Builder;

use super::FixtureStore;
use crate::config::FixtureConfig;
use crate::error::FixtureResult;
use crate::models::{Activity, ActivityKind, Post, SearchEntry, TimeAgo, User};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bela", "Carmen", "Dario", "Elif", "Farah", "Goran", "Hana", "Ivo", "Jun", "Kaia",
    "Luca", "Mina", "Noor", "Otto", "Priya", "Quinn", "Rosa", "Soren", "Tae", "Uma", "Viktor",
    "Wren", "Xiomara", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Alvarez", "Becker", "Choi", "Dubois", "Eriksen", "Fontaine", "Garcia", "Hoffmann", "Ito",
    "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura", "Okafor", "Petrov", "Rossi", "Silva",
    "Tanaka", "Novak", "Weber", "Yilmaz",
];

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur",
];

/// Build the demo account
pub fn demo_user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: "User0".to_string(),
        description: "programmer, developer".to_string(),
        profile_image_url: "https://avatars.githubusercontent.com/u/123456789?v=4".to_string(),
        is_verified: false,
    }
}

/// `base`, with a numeric suffix when already taken
fn unique_id(base: &str, taken: &mut HashSet<String>) -> String {
    let mut id = base.to_string();
    let mut n = 2;
    while taken.contains(&id) {
        id = format!("{base}{n}");
        n += 1;
    }
    taken.insert(id.clone());
    id
}

/// Random fixture generator driven by a seeded RNG
pub struct Seeder {
    rng: StdRng,
    taken_user_ids: HashSet<String>,
    taken_post_ids: HashSet<String>,
    taken_search_ids: HashSet<String>,
}

impl Seeder {
    /// Create a generator; equal seeds produce equal fixtures
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            taken_user_ids: HashSet::new(),
            taken_post_ids: HashSet::new(),
            taken_search_ids: HashSet::new(),
        }
    }

    /// Build a populated store around `demo`
    pub fn seed(mut self, config: &FixtureConfig, demo: User) -> FixtureResult<FixtureStore> {
        let demo_id = demo.id.clone();
        self.taken_user_ids.insert(demo_id.clone());
        let mut store = FixtureStore::new(demo);

        let mut user_ids = Vec::with_capacity(config.user_count);
        for _ in 0..config.user_count {
            let user = self.user();
            user_ids.push(user.id.clone());
            store.insert_user(user)?;
        }

        for owner in user_ids.iter().chain(std::iter::once(&demo_id)) {
            for _ in 0..config.posts_per_user {
                let post = self.post(owner);
                store.insert_post(post)?;
            }
        }

        let everyone: Vec<String> = std::iter::once(demo_id.clone()).chain(user_ids).collect();

        for _ in 0..config.search_entries {
            let entry = self.search_entry(&store, &everyone);
            store.insert_search_entry(entry)?;
        }

        let demo_posts: Vec<String> = store
            .posts()
            .iter()
            .filter(|p| p.user_id == demo_id)
            .map(|p| p.id.clone())
            .collect();

        for owner in &everyone {
            for _ in 0..config.activities_per_user {
                let mut activity = self.activity(owner, &demo_posts);
                activity.enrich();
                store.insert_activity(activity)?;
            }
        }

        tracing::debug!(
            users = store.users().len(),
            posts = store.posts().len(),
            activities = store.activities().len(),
            search = store.search_entries().len(),
            "Seeded fixture store"
        );

        Ok(store)
    }

    fn pick(&mut self, list: &'static [&'static str]) -> &'static str {
        list.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn full_name(&mut self) -> String {
        format!("{} {}", self.pick(FIRST_NAMES), self.pick(LAST_NAMES))
    }

    fn sentence(&mut self) -> String {
        let len = self.rng.random_range(5..12);
        let words: Vec<&str> = (0..len).map(|_| self.pick(WORDS)).collect();
        let mut sentence = words.join(" ");
        if let Some(first) = sentence.get(..1).map(str::to_uppercase) {
            sentence.replace_range(..1, &first);
        }
        sentence.push('.');
        sentence
    }

    fn paragraph(&mut self) -> String {
        let len = self.rng.random_range(3..6);
        (0..len).map(|_| self.sentence()).collect::<Vec<_>>().join(" ")
    }

    fn avatar_url(&mut self) -> String {
        format!(
            "https://avatars.githubusercontent.com/u/{}?v=4",
            self.rng.random_range(0..100_000)
        )
    }

    fn image_url(&mut self) -> String {
        format!("https://picsum.photos/seed/{}/640/480", self.rng.random_range(0..1_000_000))
    }

    fn user(&mut self) -> User {
        User {
            id: {
                let base = self.pick(FIRST_NAMES);
                unique_id(base, &mut self.taken_user_ids)
            },
            name: self.full_name(),
            description: self.sentence(),
            profile_image_url: self.avatar_url(),
            is_verified: self.rng.random_bool(0.5),
        }
    }

    fn post(&mut self, owner: &str) -> Post {
        let id = loop {
            let candidate = format!("{:06}", self.rng.random_range(0..1_000_000));
            if self.taken_post_ids.insert(candidate.clone()) {
                break candidate;
            }
        };
        let images = self.rng.random_range(0..3);
        Post {
            id,
            content: self.paragraph(),
            image_urls: (0..images).map(|_| self.image_url()).collect(),
            location: None,
            likes: self.rng.random_range(0..100),
            comments: self.rng.random_range(0..100),
            reposts: self.rng.random_range(0..100),
            user_id: owner.to_string(),
        }
    }

    fn search_entry(&mut self, store: &FixtureStore, owners: &[String]) -> SearchEntry {
        let user_id = owners.choose(&mut self.rng).cloned().unwrap_or_default();
        let post_id = if self.rng.random_bool(0.3) {
            let own: Vec<&Post> = store.posts().iter().filter(|p| p.user_id == user_id).collect();
            own.choose(&mut self.rng).map(|p| p.id.clone())
        } else {
            None
        };
        let base = self.pick(FIRST_NAMES);
        SearchEntry {
            id: unique_id(base, &mut self.taken_search_ids),
            name: self.full_name(),
            content: self.sentence(),
            profile_image_url: self.avatar_url(),
            followers: self.rng.random_range(0..10_000),
            is_followed: self.rng.random_bool(0.5),
            is_connections: self.rng.random_bool(0.8),
            is_verified: self.rng.random_bool(0.3),
            user_id,
            post_id,
        }
    }

    fn activity(&mut self, owner: &str, demo_posts: &[String]) -> Activity {
        let id = Builder::from_random_bytes(self.rng.random()).into_uuid().to_string();
        let kind = *ActivityKind::all().choose(&mut self.rng).unwrap_or(&ActivityKind::Like);
        let mut activity = Activity::new(id, kind, owner);
        activity.time_ago = *TimeAgo::all().choose(&mut self.rng).unwrap_or(&TimeAgo::OneHour);
        activity.other_count = self
            .rng
            .random_bool(0.3)
            .then(|| self.rng.random_range(1..=10));
        activity.likes = self.rng.random_bool(0.5).then(|| self.rng.random_range(0..50));
        activity.is_read = self.rng.random_bool(0.7);
        if !matches!(kind, ActivityKind::Followed | ActivityKind::Verified) {
            activity.post_id = demo_posts.choose(&mut self.rng).cloned();
        }
        activity
    }
}

impl FixtureStore {
    /// Build a store populated per `config`
    pub fn seeded(config: &FixtureConfig, demo_user_id: &str) -> FixtureResult<Self> {
        Seeder::new(config.seed).seed(config, demo_user(demo_user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identified;
    use crate::store::PostFilter;

    fn default_store() -> FixtureStore {
        FixtureStore::seeded(&FixtureConfig::default(), "user0").unwrap()
    }

    #[test]
    fn test_default_counts() {
        let store = default_store();
        assert_eq!(store.users().len(), 11);
        assert_eq!(store.posts().len(), 55);
        assert_eq!(store.search_entries().len(), 20);
        assert_eq!(store.activities().len(), 110);
        assert_eq!(store.demo_user().id, "user0");
        assert_eq!(store.demo_user().description, "programmer, developer");
    }

    #[test]
    fn test_same_seed_same_fixtures() {
        let a = default_store();
        let b = default_store();
        assert_eq!(a.posts(), b.posts());
        assert_eq!(a.activities(), b.activities());
        assert_eq!(a.search_entries(), b.search_entries());

        let config = FixtureConfig { seed: 7, ..FixtureConfig::default() };
        let c = FixtureStore::seeded(&config, "user0").unwrap();
        assert_ne!(a.posts(), c.posts());
    }

    #[test]
    fn test_every_entity_has_an_owner() {
        let store = default_store();
        assert!(store.posts().iter().all(|p| store.user(&p.user_id).is_some()));
        assert!(store.activities().iter().all(|a| store.user(&a.user_id).is_some()));
        assert!(store.search_entries().iter().all(|e| store.user(&e.user_id).is_some()));
    }

    #[test]
    fn test_post_shape() {
        let store = default_store();
        for post in store.posts() {
            assert_eq!(post.id.len(), 6);
            assert!(post.id.chars().all(|c| c.is_ascii_digit()));
            assert!(post.image_urls.len() < 3);
            assert!(post.likes < 100);
        }
        let mine = store.list_posts(PostFilter::Following, None);
        assert_eq!(mine.len(), 5);
    }

    #[test]
    fn test_activities_are_enriched() {
        let store = default_store();
        for activity in store.activities() {
            assert_eq!(activity.content, activity.kind.message());
            assert_eq!(activity.is_verified, activity.kind == ActivityKind::Verified);
            assert!(uuid::Uuid::parse_str(activity.id()).is_ok());
            if let Some(others) = activity.other_count {
                assert!((1..=10).contains(&others));
            }
            if let Some(post_id) = &activity.post_id {
                assert_eq!(store.post(post_id).unwrap().user_id, "user0");
            }
        }
    }

    #[test]
    fn test_unique_name_ids() {
        let config = FixtureConfig {
            user_count: 60,
            posts_per_user: 0,
            search_entries: 0,
            activities_per_user: 0,
            ..FixtureConfig::default()
        };
        let store = FixtureStore::seeded(&config, "user0").unwrap();
        assert_eq!(store.users().len(), 61);
    }
}

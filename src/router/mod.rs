//! Request dispatch for the fixture API
//!
//! [`FixtureApi::handle`] matches on (method, path segments) and calls one
//! handler per route. Handlers lock the store only while they read or write
//! it; the simulated upload delay on `POST /posts` runs before the lock is
//! taken.

mod request;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::Mutex;

pub use request::{Body, Method, Request, Response, parse_query};

use crate::auth::{self, LoginRequest};
use crate::config::{AuthConfig, Config};
use crate::error::{FixtureError, FixtureResult};
use crate::models::{ActivityFilter, Post, ThreadPost};
use crate::multipart::decode_thread_posts;
use crate::store::{FixtureStore, PostFilter, ProfileTab};

/// The fake backend: a store plus the routes that query it
#[derive(Clone)]
pub struct FixtureApi {
    store: Arc<Mutex<FixtureStore>>,
    auth: AuthConfig,
    upload_delay: Duration,
}

impl FixtureApi {
    /// Wrap an existing store
    pub fn new(store: FixtureStore, auth: AuthConfig, upload_delay: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            auth,
            upload_delay,
        }
    }

    /// Seed a store from `config`; the demo user is the login username
    pub fn from_config(config: &Config) -> FixtureResult<Self> {
        let store = FixtureStore::seeded(&config.fixtures, &config.auth.username)?;
        Ok(Self::new(store, config.auth.clone(), config.server.upload_delay()))
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> Arc<Mutex<FixtureStore>> {
        Arc::clone(&self.store)
    }

    /// Serve one request. Errors become `{message}` bodies.
    pub async fn handle(&self, request: Request) -> Response {
        tracing::debug!(method = %request.method, path = %request.path, "Dispatching request");
        match self.route(&request).await {
            Ok(response) => response,
            Err(err) => {
                if err.status() >= 500 {
                    tracing::error!(method = %request.method, path = %request.path, "Request failed: {err}");
                } else {
                    tracing::debug!(status = err.status(), "Request rejected: {err}");
                }
                Response::error(&err)
            }
        }
    }

    async fn route(&self, req: &Request) -> FixtureResult<Response> {
        let segments = req.segments();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match (&req.method, segments.as_slice()) {
            (Method::Post, ["login"]) => self.login(req).await,
            (Method::Get, ["posts"]) => self.list_posts(req).await,
            (Method::Post, ["posts"]) => self.create_posts(req).await,
            (Method::Get, ["posts", id]) => self.get_post(id).await,
            (Method::Get, ["posts", id, "comments"]) => self.list_comments(id, req).await,
            (Method::Get, ["users", id]) => self.get_user(id).await,
            (Method::Get, ["users", id, tab]) => self.list_user_posts(id, tab, req).await,
            (Method::Get, ["search"]) => self.search(req).await,
            (Method::Get, ["activities"]) => self.list_activities(req).await,
            _ => Err(FixtureError::NoRoute {
                method: req.method.to_string(),
                path: req.path.clone(),
            }),
        }
    }

    async fn login(&self, req: &Request) -> FixtureResult<Response> {
        let credentials: LoginRequest = match &req.body {
            Body::Json(value) => serde_json::from_value(value.clone())
                .map_err(|e| FixtureError::InvalidBody(e.to_string()))?,
            _ => return Err(FixtureError::InvalidBody("expected a JSON body".to_string())),
        };

        let store = self.store.lock().await;
        let response = auth::authenticate(&self.auth, &credentials, store.demo_user())?;
        Response::ok(&response)
    }

    async fn list_posts(&self, req: &Request) -> FixtureResult<Response> {
        let filter = req.param("type").map(PostFilter::parse).unwrap_or_default();
        let store = self.store.lock().await;
        let page = store.list_posts(filter, req.cursor());
        Response::ok(&json!({ "posts": store.embed_all(&page)? }))
    }

    async fn get_post(&self, id: &str) -> FixtureResult<Response> {
        let store = self.store.lock().await;
        let post = store.post(id).ok_or_else(|| FixtureError::not_found("post", id))?;
        Response::ok(&json!({ "post": store.embed(post)? }))
    }

    async fn list_comments(&self, id: &str, req: &Request) -> FixtureResult<Response> {
        let store = self.store.lock().await;
        let page = store.list_comments(id, req.cursor());
        Response::ok(&json!({ "posts": store.embed_all(&page)? }))
    }

    async fn get_user(&self, id: &str) -> FixtureResult<Response> {
        let id = strip_handle(id);
        let store = self.store.lock().await;
        let user = store.user(id).ok_or_else(|| FixtureError::not_found("user", id))?;
        Response::ok(&json!({ "user": user }))
    }

    async fn list_user_posts(&self, id: &str, tab: &str, req: &Request) -> FixtureResult<Response> {
        let id = strip_handle(id);
        let store = self.store.lock().await;
        let page = store.list_user_posts(id, ProfileTab::parse(tab), req.cursor());
        Response::ok(&json!({ "posts": store.embed_all(&page)? }))
    }

    async fn search(&self, req: &Request) -> FixtureResult<Response> {
        let store = self.store.lock().await;
        let page = store.search(req.param("q"), req.cursor());
        Response::ok(&json!({ "results": store.embed_search_all(&page)? }))
    }

    async fn list_activities(&self, req: &Request) -> FixtureResult<Response> {
        let filter = req.param("type").map(ActivityFilter::parse).unwrap_or_default();
        let store = self.store.lock().await;
        let page = store.list_activities(filter, req.cursor());
        Response::ok(&json!({ "activities": store.embed_all(&page)? }))
    }

    async fn create_posts(&self, req: &Request) -> FixtureResult<Response> {
        let Body::Form(fields) = &req.body else {
            return Err(FixtureError::InvalidBody("expected a multipart form".to_string()));
        };
        let mut threads = decode_thread_posts(fields)?;

        if !self.upload_delay.is_zero() {
            tokio::time::sleep(self.upload_delay).await;
        }

        let mut store = self.store.lock().await;
        let posts = plan_posts(&store, &mut threads)?;
        let count = posts.len();
        for post in posts {
            store.insert_post(post)?;
        }
        tracing::info!(count, "Created posts");

        Response::ok(&threads)
    }
}

/// Turn decoded threads into posts owned by the demo user.
///
/// Threads without an id get fresh numeric ids above every existing and
/// submitted one, which are written back into `threads`. Fails without side
/// effects if any id is already taken.
fn plan_posts(store: &FixtureStore, threads: &mut [ThreadPost]) -> FixtureResult<Vec<Post>> {
    let owner = store.demo_user().id.clone();
    let submitted_next = threads
        .iter()
        .filter_map(|t| t.id.as_deref()?.parse::<u64>().ok())
        .max()
        .map_or(Some(1), |max| max.checked_add(1));
    // `None` once u64::MAX is in use
    let mut next_id = store.next_post_id().zip(submitted_next).map(|(a, b)| a.max(b));
    let mut posts: Vec<Post> = Vec::with_capacity(threads.len());

    for thread in threads.iter_mut() {
        let id = match thread.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => {
                let fresh = next_id.ok_or(FixtureError::IdsExhausted { kind: "post" })?;
                next_id = fresh.checked_add(1);
                let id = fresh.to_string();
                thread.id = Some(id.clone());
                id
            }
        };
        if store.post(&id).is_some() || posts.iter().any(|p| p.id == id) {
            return Err(FixtureError::DuplicateId { kind: "post", id });
        }

        let mut post = Post::new(id, owner.as_str());
        post.content = thread.content.clone();
        post.image_urls = thread.image_urls.clone();
        post.location = thread.location;
        posts.push(post);
    }

    Ok(posts)
}

/// Profile routes may carry the `@` of a handle
fn strip_handle(id: &str) -> &str {
    id.strip_prefix('@').unwrap_or(id)
}

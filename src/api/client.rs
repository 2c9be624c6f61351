//! HTTP client for the fixture server

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::auth::{LoginRequest, LoginResponse};
use crate::models::{Activity, ActivityFilter, Embedded, Post, SearchResult, ThreadPost, User};
use crate::store::{PostFilter, ProfileTab};

#[derive(Deserialize)]
struct PostsResponse {
    posts: Vec<Embedded<Post>>,
}

#[derive(Deserialize)]
struct PostResponse {
    post: Embedded<Post>,
}

#[derive(Deserialize)]
struct UserResponse {
    user: User,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct ActivitiesResponse {
    activities: Vec<Embedded<Activity>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Client for the fixture API
#[derive(Debug, Clone)]
pub struct FixtureClient {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl FixtureClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:4000`)
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
        }
    }

    /// Send `token` as a bearer token from now on
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Server base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL; `None` parameters are left out
    fn url(&self, path: &str, params: &[(&str, Option<&str>)]) -> String {
        let query: Vec<String> = params
            .iter()
            .filter_map(|(key, value)| value.map(|v| format!("{key}={}", urlencoding::encode(v))))
            .collect();
        if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{}", self.base_url, query.join("&"))
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .with_context(|| format!("Failed to fetch {what}"))?;
        read_json(response, what).await
    }

    /// `POST /login`
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .post(self.url("/login", &[]))
            .json(&request)
            .send()
            .await
            .context("Failed to log in")?;

        read_json(response, "login").await
    }

    /// `GET /posts`
    pub async fn posts(&self, filter: PostFilter, cursor: Option<&str>) -> Result<Vec<Embedded<Post>>> {
        let url = self.url("/posts", &[("type", Some(filter.as_str())), ("cursor", cursor)]);
        let page: PostsResponse = self.get(&url, "posts").await?;
        Ok(page.posts)
    }

    /// `GET /posts/:id`
    pub async fn post(&self, id: &str) -> Result<Embedded<Post>> {
        let url = self.url(&format!("/posts/{}", urlencoding::encode(id)), &[]);
        let body: PostResponse = self.get(&url, "post").await?;
        Ok(body.post)
    }

    /// `GET /posts/:id/comments`
    pub async fn comments(&self, post_id: &str, cursor: Option<&str>) -> Result<Vec<Embedded<Post>>> {
        let path = format!("/posts/{}/comments", urlencoding::encode(post_id));
        let page: PostsResponse = self.get(&self.url(&path, &[("cursor", cursor)]), "comments").await?;
        Ok(page.posts)
    }

    /// `GET /users/:id`
    pub async fn user(&self, id: &str) -> Result<User> {
        let url = self.url(&format!("/users/{}", urlencoding::encode(id)), &[]);
        let body: UserResponse = self.get(&url, "user").await?;
        Ok(body.user)
    }

    /// `GET /users/:id/:type`
    pub async fn user_posts(&self, id: &str, tab: ProfileTab, cursor: Option<&str>) -> Result<Vec<Embedded<Post>>> {
        let path = format!("/users/{}/{}", urlencoding::encode(id), tab.as_str());
        let page: PostsResponse = self.get(&self.url(&path, &[("cursor", cursor)]), "profile posts").await?;
        Ok(page.posts)
    }

    /// `GET /search`
    pub async fn search(&self, query: &str, cursor: Option<&str>) -> Result<Vec<SearchResult>> {
        let url = self.url("/search", &[("q", Some(query)), ("cursor", cursor)]);
        let page: SearchResponse = self.get(&url, "search results").await?;
        Ok(page.results)
    }

    /// `GET /activities`
    pub async fn activities(&self, filter: ActivityFilter, cursor: Option<&str>) -> Result<Vec<Embedded<Activity>>> {
        let url = self.url("/activities", &[("type", Some(filter.as_str())), ("cursor", cursor)]);
        let page: ActivitiesResponse = self.get(&url, "activities").await?;
        Ok(page.activities)
    }

    /// `POST /posts` with the composer's multipart encoding
    pub async fn create_posts(&self, threads: &[ThreadPost]) -> Result<Vec<ThreadPost>> {
        let form = thread_form(threads).context("Failed to encode thread")?;

        let response = self
            .authorized(self.client.post(self.url("/posts", &[])))
            .multipart(form)
            .send()
            .await
            .context("Failed to create posts")?;

        read_json(response, "create posts").await
    }
}

/// Flatten threads into `posts[i][field]` parts. Attachments go as empty file
/// parts named after their URI.
fn thread_form(threads: &[ThreadPost]) -> Result<Form> {
    let mut form = Form::new().percent_encode_noop();

    for (i, thread) in threads.iter().enumerate() {
        if let Some(id) = &thread.id {
            form = form.text(format!("posts[{i}][id]"), id.clone());
        }
        form = form.text(format!("posts[{i}][content]"), thread.content.clone());
        if let Some(user_id) = &thread.user_id {
            form = form.text(format!("posts[{i}][userId]"), user_id.clone());
        }
        if let Some(location) = &thread.location {
            form = form.text(format!("posts[{i}][location]"), serde_json::to_string(location)?);
        }
        for (j, uri) in thread.image_urls.iter().enumerate() {
            let part = Part::bytes(Vec::new()).file_name(uri.clone());
            form = form.part(format!("posts[{i}][imageUrls][{j}]"), part);
        }
    }

    Ok(form)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body).map_or(body, |e| e.message);
        anyhow::bail!("Server error {status}: {message}");
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse {what} response"))
}

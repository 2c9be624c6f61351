//! HTTP listener
//!
//! axum only does transport here: every request goes through one fallback
//! handler that converts it into a [`Request`] and hands it to
//! [`FixtureApi::handle`].

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Json, Router};
use axum::body::to_bytes;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tokio::net::TcpListener;

use crate::config::{Config, ServerConfig};
use crate::error::{FixtureError, FixtureResult};
use crate::multipart::{FormField, FormValue};
use crate::router::{Body, FixtureApi, Method, Request, Response};

/// Largest non-multipart body accepted
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Router sending every path to the dispatcher.
///
/// Multipart uploads may be up to `max_upload_bytes` long.
pub fn router(api: Arc<FixtureApi>, max_upload_bytes: usize) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(api)
}

/// Seed fixtures from `config` and serve until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let api = FixtureApi::from_config(config).context("Failed to seed fixtures")?;
    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    tracing::info!(%addr, "Fixture server listening");

    axum::serve(listener, router(Arc::new(api), config.server.max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Fixture server stopped");
    Ok(())
}

/// Serve `api` on a background task and return the bound address.
///
/// Bind to port 0 to let the OS pick one.
pub async fn spawn(api: FixtureApi, server: &ServerConfig) -> Result<SocketAddr> {
    let listener = TcpListener::bind(&server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", server.bind))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    let app = router(Arc::new(api), server.max_upload_bytes);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Fixture server failed: {e}");
        }
    });

    Ok(addr)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
    }
}

async fn dispatch(State(api): State<Arc<FixtureApi>>, request: axum::extract::Request) -> axum::response::Response {
    let response = match read_request(request).await {
        Ok(request) => api.handle(request).await,
        Err(err) => Response::error(&err),
    };
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}

async fn read_request(request: axum::extract::Request) -> FixtureResult<Request> {
    let method = Method::parse(request.method().as_str());
    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.as_str().to_string());
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let body = if is_multipart {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| FixtureError::InvalidBody(e.body_text()))?;
        Body::Form(read_form(&mut multipart).await?)
    } else {
        let bytes = to_bytes(request.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|e| FixtureError::InvalidBody(e.to_string()))?;
        parse_body(&bytes)
    };

    Ok(Request::new(method, &target).with_body(body))
}

/// Collect parts in order. File contents are drained and dropped.
async fn read_form(multipart: &mut Multipart) -> FixtureResult<Vec<FormField>> {
    let mut fields = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| FixtureError::InvalidBody(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let value = match field.file_name().map(str::to_string) {
            Some(file_name) => {
                field
                    .bytes()
                    .await
                    .map_err(|e| FixtureError::InvalidBody(e.body_text()))?;
                FormValue::File {
                    file_name: Some(file_name),
                }
            }
            None => FormValue::Text(
                field
                    .text()
                    .await
                    .map_err(|e| FixtureError::InvalidBody(e.body_text()))?,
            ),
        };
        fields.push(FormField { name, value });
    }

    Ok(fields)
}

/// JSON when it parses, whatever the content type says
fn parse_body(bytes: &[u8]) -> Body {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Body::Empty;
    }
    serde_json::from_slice(bytes).map_or_else(
        |_| Body::Text(String::from_utf8_lossy(bytes).into_owned()),
        Body::Json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::models::{Post, User};
    use crate::store::{FixtureStore, demo_user};
    use std::time::Duration;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b""), Body::Empty);
        assert_eq!(parse_body(b"  \n"), Body::Empty);
        assert_eq!(parse_body(br#"{"a":1}"#), Body::Json(serde_json::json!({"a": 1})));
        assert_eq!(parse_body(b"plain"), Body::Text("plain".to_string()));
    }

    async fn spawn_small() -> SocketAddr {
        let mut store = FixtureStore::new(demo_user("user0"));
        store.insert_user(User::new("ada", "Ada")).unwrap();
        for i in 1..=3 {
            store.insert_post(Post::new(i.to_string(), "ada")).unwrap();
        }
        let api = FixtureApi::new(store, AuthConfig::default(), Duration::ZERO);
        spawn(api, &local_server()).await.unwrap()
    }

    fn local_server() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:0".to_string(),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_http_roundtrip() {
        let addr = spawn_small().await;
        let http = reqwest::Client::new();

        let res = http.get(format!("http://{addr}/posts")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["posts"][0]["id"], "3");
        assert_eq!(body["posts"][0]["user"]["name"], "Ada");

        let res = http.get(format!("http://{addr}/posts/99")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_login_without_content_type() {
        let addr = spawn_small().await;
        let res = reqwest::Client::new()
            .post(format!("http://{addr}/login"))
            .body(r#"{"username":"user0","password":"1234"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["accessToken"], "access-token");
    }

    #[tokio::test]
    async fn test_multipart_upload() {
        let addr = spawn_small().await;
        let form = reqwest::multipart::Form::new()
            .percent_encode_noop()
            .text("posts[0][content]", "from the wire")
            .text("posts[0][location]", "[1.5, 2.5]")
            .part(
                "posts[0][imageUrls][0]",
                reqwest::multipart::Part::bytes(Vec::new()).file_name("file:///photo.jpg"),
            );

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/posts"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body[0]["id"], "4");
        assert_eq!(body[0]["content"], "from the wire");
        assert_eq!(body[0]["imageUrls"][0], "file:///photo.jpg");
        assert_eq!(body[0]["location"], serde_json::json!([1.5, 2.5]));
    }

    #[tokio::test]
    async fn test_photo_sized_upload() {
        let addr = spawn_small().await;
        let photo = vec![0xFF_u8; 3 * 1024 * 1024];
        let form = reqwest::multipart::Form::new()
            .percent_encode_noop()
            .text("posts[0][content]", "big photo")
            .part(
                "posts[0][imageUrls][0]",
                reqwest::multipart::Part::bytes(photo).file_name("file:///big.jpg"),
            );

        let res = reqwest::Client::new()
            .post(format!("http://{addr}/posts"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body[0]["imageUrls"][0], "file:///big.jpg");
    }
}

//! # Thimble 🧵
//!
//! An in-memory fixture backend for a Threads-style social client, plus the
//! client pieces that talk to it.
//!
//! ## Overview
//!
//! Thimble seeds a deterministic set of users, posts, activities and search
//! entries, then serves them over a small REST surface with cursor
//! pagination. It exists so a client can be built and tested without a real
//! backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Server                              │
//! │     axum listener, converts HTTP into fixture requests      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Router                               │
//! │   (method, path) → handler, errors → {message} + status     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │     Store       │ │    Multipart    │ │      Auth       │
//! │                 │ │                 │ │                 │
//! │ • Seeding       │ │ • posts[i][f]   │ │ • One fixed     │
//! │ • Filters       │ │ • Image order   │ │   credential    │
//! │ • Pagination    │ │ • Location      │ │ • Fixed tokens  │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — HTTP client and page sources
//! - [`auth`] — Login stub
//! - [`config`] — Configuration management
//! - [`debounce`] — Latest-wins debouncer for search input
//! - [`feed`] — Infinite-scroll accumulation
//! - [`models`] — Data models (User, Post, Activity, `SearchEntry`)
//! - [`multipart`] — Composer form decoding
//! - [`pagination`] — Cursor pagination
//! - [`router`] — Request dispatch
//! - [`server`] — HTTP listener
//! - [`store`] — In-memory fixture store and seeding
//!
//! ## Example
//!
//! ```no_run
//! use thimble::{Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     server::serve(&Config::default()).await
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/thimble/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::if_not_else)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::similar_names)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::wrong_self_convention)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod auth;
pub mod config;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod models;
pub mod multipart;
pub mod pagination;
pub mod paths;
pub mod router;
pub mod server;
pub mod store;

// Re-export main types for convenience
pub use api::FixtureClient;
pub use config::Config;
pub use error::{FixtureError, FixtureResult};
pub use models::{Activity, ActivityFilter, Post, SearchEntry, SearchResult, ThreadPost, User};
pub use router::FixtureApi;
pub use store::FixtureStore;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

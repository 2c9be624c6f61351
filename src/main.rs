//! Thimble - fixture backend and client for a Threads-style social app
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use thimble::api::{ActivityFeed, PostFeed};
use thimble::debounce::Debouncer;
use thimble::feed::Feed;
use thimble::models::Embedded;
use thimble::store::PostFilter;
use thimble::{Activity, ActivityFilter, Config, FixtureClient, Post, ThreadPost};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = parse_args()?;
    let config = Config::load()?;

    match command {
        Command::Serve { bind } => serve(config, bind).await,
        Command::Login { username, password } => login(&config, username, password).await,
        Command::Feed { filter, limit } => feed(&config, filter, limit).await,
        Command::Post { threads } => post(&config, threads).await,
        Command::Activity { filter } => activity(&config, filter).await,
        Command::Search { query } => search(&config, query).await,
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Serve {
        bind: Option<String>,
    },
    Login {
        username: Option<String>,
        password: Option<String>,
    },
    Feed {
        filter: PostFilter,
        limit: usize,
    },
    Post {
        threads: Vec<String>,
    },
    Activity {
        filter: ActivityFilter,
    },
    Search {
        query: String,
    },
    Help,
    Version,
}

fn flag_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a String> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Help);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "serve" => Ok(Command::Serve {
            bind: flag_value(&args, &["--bind", "-b"]).cloned(),
        }),

        "login" => Ok(Command::Login {
            username: args.get(2).cloned(),
            password: args.get(3).cloned(),
        }),

        "feed" => {
            let filter = match args.get(2).map(String::as_str) {
                Some("following") => PostFilter::Following,
                _ => PostFilter::All,
            };
            let limit = flag_value(&args, &["--limit", "-l"])
                .and_then(|s| s.parse().ok())
                .unwrap_or(20);
            Ok(Command::Feed { filter, limit })
        }

        "post" => {
            let threads: Vec<String> = args[2..].to_vec();
            if threads.is_empty() {
                anyhow::bail!("Missing post content");
            }
            Ok(Command::Post { threads })
        }

        "activity" | "activities" => Ok(Command::Activity {
            filter: args.get(2).map_or(ActivityFilter::All, |s| ActivityFilter::parse(s)),
        }),

        "search" => {
            let query = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing search query"))?
                .clone();
            Ok(Command::Search { query })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'thimble --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"🧵 Thimble - fixture backend for a Threads-style client

USAGE:
    thimble [COMMAND]

COMMANDS:
    serve [OPTIONS]                    Run the fixture server
      Options:
        -b, --bind <addr>              Listen address (default: from config)

    login [username password]          Log in (default: configured demo user)

    feed [following] [OPTIONS]         Page through the home feed
      Options:
        -l, --limit <n>                Number of posts (default: 20)

    post <thread>...                   Publish a thread, one post per argument
      Examples:
        thimble post "Hello" "and a follow-up"

    activity [type]                    Show recent activity
      Types: all, follows, replies, mentions, quotes, verified

    search <query>                     Search people and posts

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

ENVIRONMENT:
    RUST_LOG                           Log filter (default: warn)

CONFIG:
    {}
"#,
        config_path
    );
}

fn print_version() {
    println!("thimble {}", thimble::VERSION);
}

fn client(config: &Config) -> FixtureClient {
    FixtureClient::new(&config.client.base_url)
}

async fn serve(mut config: Config, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    println!("🧵 Serving fixtures on http://{} (Ctrl-C to stop)", config.server.bind);
    thimble::server::serve(&config).await
}

async fn login(config: &Config, username: Option<String>, password: Option<String>) -> Result<()> {
    let username = username.unwrap_or_else(|| config.auth.username.clone());
    let password = password.unwrap_or_else(|| config.auth.password.clone());

    let session = client(config).login(&username, &password).await?;

    println!("✓ Logged in as {} ({})", session.user.name, session.user.handle());
    println!("  access token:  {}", session.access_token);
    println!("  refresh token: {}", session.refresh_token);
    Ok(())
}

async fn feed(config: &Config, filter: PostFilter, limit: usize) -> Result<()> {
    let client = client(config);
    let mut feed: Feed<Embedded<Post>> = Feed::sorted(Post::sort_recent_first);
    feed.load_up_to(&PostFeed::new(&client, filter), limit).await?;

    if feed.items().is_empty() {
        println!("No posts.");
        return Ok(());
    }

    for post in feed.items().iter().take(limit) {
        println!("\n{} · #{}", post.user.handle(), post.id);
        println!("{}", post.preview(200));
        println!("♥ {}  🔁 {}  💬 {}", post.likes, post.reposts, post.comments);
    }
    Ok(())
}

async fn post(config: &Config, threads: Vec<String>) -> Result<()> {
    let threads: Vec<ThreadPost> = threads
        .into_iter()
        .map(|content| ThreadPost {
            content,
            user_id: Some(config.auth.username.clone()),
            ..ThreadPost::default()
        })
        .collect();

    let created = client(config).create_posts(&threads).await?;
    for thread in &created {
        println!("✓ Posted #{}", thread.id.as_deref().unwrap_or("?"));
    }
    Ok(())
}

async fn activity(config: &Config, filter: ActivityFilter) -> Result<()> {
    let client = client(config);
    let mut activities: Feed<Embedded<Activity>> = Feed::sorted(Activity::sort_recent_first);
    activities.load_more(&ActivityFeed::new(&client, filter)).await?;

    if activities.items().is_empty() {
        println!("No activity.");
        return Ok(());
    }

    for item in activities.items() {
        let others = item
            .other_count
            .map_or_else(String::new, |n| format!(" and {n} others"));
        println!(
            "{:>3}  {}{} {}",
            item.time_ago.as_str(),
            item.user.name,
            others,
            item.kind.message()
        );
    }
    Ok(())
}

async fn search(config: &Config, query: String) -> Result<()> {
    let client = client(config);
    let debouncer = Debouncer::new(config.client.search_debounce());

    let results = debouncer
        .call(move || async move { client.search(&query, None).await })
        .await
        .context("Search task failed")?;

    let Some(results) = results else {
        return Ok(());
    };

    let results = results?;
    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for entry in &results {
        let check = if entry.is_verified { " ✓" } else { "" };
        println!("{}{} · {} followers", entry.name, check, entry.followers);
        println!("  {}", entry.content);
        if let Some(post) = &entry.post {
            println!("  ↳ {} · #{}: {}", post.user.handle(), post.id, post.preview(80));
        }
    }
    Ok(())
}

//! postdeck — terminal front end for the reconciled post feed.
//!
//! Usage:
//!   # Against the public sandbox
//!   cargo run -p postdeck-app
//!
//!   # Against a local stand-in
//!   cargo run -p postdeck-app -- --base-url http://localhost:8080
//!
//! Type `help` at the prompt for the command list.

mod repl;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use postdeck_client::PostsApi;
use postdeck_client::constants::DEFAULT_BASE_URL;
use postdeck_core::{NoticeBoard, PostFeed};

use crate::repl::Repl;

/// Post management against a sandbox REST API.
#[derive(Parser, Debug)]
#[command(name = "postdeck")]
#[command(about = "List, add, edit, and delete posts with local-first reconciliation")]
struct Args {
    /// Sandbox API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Author user id stamped onto new posts
    #[arg(long, default_value_t = 1)]
    user_id: u64,

    /// Seconds a notification stays on screen
    #[arg(long, default_value_t = 3)]
    notice_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr so the table output stays clean.
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    tracing::debug!(base_url = %args.base_url, user_id = args.user_id, "starting");

    let api = PostsApi::new(&args.base_url);
    let notices = NoticeBoard::new(Duration::from_secs(args.notice_ttl_secs));
    let feed = PostFeed::with_notices(api, args.user_id, notices);

    Repl::new(feed).run().await
}

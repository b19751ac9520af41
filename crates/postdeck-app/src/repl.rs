//! Interactive command loop over the post feed.
//!
//! Parsing and rendering are plain functions over the core types; the loop
//! itself only shuttles lines in and strings out. Posts are addressed by
//! their remote integer id or by a unique hex prefix of a local id
//! (`local:` prefix optional).

use std::io::Write;

use postdeck_client::PostSource;
use postdeck_core::{
    FeedView, NoticeKind, PostFeed, Sort, SortDirection, SortKey, StatusFilter, UserFilter,
    ViewQuery,
};
use postdeck_types::{Post, PostId};

const HELP: &str = "\
commands:
  list                 show the current view
  refresh              re-fetch posts from the sandbox
  add <title>          create a post
  delete <id>          delete a post (local: no remote call)
  title <id> <text>    retitle a post
  done <id>            mark completed
  todo <id>            mark not completed
  sort <key>           order by title | user | completed (repeat to flip)
  status <f>           filter by all | done | todo
  user <all|N>         filter by author
  help                 this text
  quit                 exit";

/// Failure to turn a user-supplied id string into a post identity.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no post matching '{0}'")]
    NoMatch(String),
    #[error("ambiguous id '{prefix}': matches {candidates:?}")]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
}

/// Resolve a query string against the visible collection.
///
/// A numeric query names a remote post if one exists; otherwise it falls
/// through to unique hex-prefix matching on local ids (local id hex can be
/// all digits).
pub fn resolve_post_id(posts: &[Post], query: &str) -> Result<PostId, ResolveError> {
    let raw = query.strip_prefix("local:").unwrap_or(query);

    if !query.starts_with("local:")
        && let Ok(n) = raw.parse::<u64>()
        && posts.iter().any(|p| p.id == PostId::Remote(n))
    {
        return Ok(PostId::Remote(n));
    }

    let matches: Vec<PostId> = posts
        .iter()
        .filter(|p| {
            p.id.as_local()
                .is_some_and(|local| local.matches_hex_prefix(raw))
        })
        .map(|p| p.id)
        .collect();

    match matches.len() {
        0 => Err(ResolveError::NoMatch(query.to_string())),
        1 => Ok(matches[0]),
        _ => Err(ResolveError::Ambiguous {
            prefix: query.to_string(),
            candidates: matches.iter().map(|id| id.to_string()).collect(),
        }),
    }
}

/// A parsed user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    Add(String),
    Delete(String),
    Title(String, String),
    Done(String),
    Todo(String),
    Sort(SortKey),
    Status(StatusFilter),
    User(UserFilter),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        let mut tokens = line.split_whitespace();
        let Some(head) = tokens.next() else {
            return Ok(None);
        };
        let rest = line[head.len()..].trim_start();

        let one_id = |rest: &str, usage: &str| -> Result<String, String> {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(id), None) => Ok(id.to_string()),
                _ => Err(format!("usage: {usage}")),
            }
        };

        let command = match head {
            "list" | "ls" => Command::List,
            "refresh" => Command::Refresh,
            "add" => {
                if rest.is_empty() {
                    return Err("usage: add <title>".into());
                }
                Command::Add(rest.to_string())
            }
            "delete" | "rm" => Command::Delete(one_id(rest, "delete <id>")?),
            "title" => {
                let mut parts = rest.split_whitespace();
                let Some(id) = parts.next() else {
                    return Err("usage: title <id> <text>".into());
                };
                let text = rest[id.len()..].trim_start();
                if text.is_empty() {
                    return Err("usage: title <id> <text>".into());
                }
                Command::Title(id.to_string(), text.to_string())
            }
            "done" => Command::Done(one_id(rest, "done <id>")?),
            "todo" => Command::Todo(one_id(rest, "todo <id>")?),
            "sort" => {
                let key = rest
                    .parse::<SortKey>()
                    .map_err(|_| "sort key must be one of: title, user, completed".to_string())?;
                Command::Sort(key)
            }
            "status" => {
                let filter = rest
                    .parse::<StatusFilter>()
                    .map_err(|_| "status must be one of: all, done, todo".to_string())?;
                Command::Status(filter)
            }
            "user" => {
                if rest == "all" {
                    Command::User(UserFilter::All)
                } else {
                    let id = rest
                        .parse::<u64>()
                        .map_err(|_| "usage: user <all|N>".to_string())?;
                    Command::User(UserFilter::Only(id))
                }
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{other}' (try `help`)")),
        };
        Ok(Some(command))
    }
}

fn render_table(view: &FeedView, query: &ViewQuery) -> String {
    if !view.loaded {
        return "No data yet — run `refresh`.".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<14} {:>4}  {:<5} {}\n",
        "ID", "USER", "DONE", "TITLE"
    ));
    for post in &view.posts {
        out.push_str(&format!(
            "{:<14} {:>4}  {:<5} {}\n",
            post.id.to_string(),
            post.user_id,
            if post.completed { "yes" } else { "no" },
            post.title,
        ));
    }

    let users = view
        .user_ids
        .iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!("{} posts — users: {}", view.posts.len(), users));

    if let Some(Sort { key, direction }) = query.sort {
        let arrow = match direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        out.push_str(&format!(" — sorted by {key} ({arrow})"));
    }
    out
}

pub enum Outcome {
    Continue(String),
    Quit,
}

/// The command loop: a feed plus the user's current filter/sort selection.
pub struct Repl<S> {
    feed: PostFeed<S>,
    query: ViewQuery,
}

impl<S: PostSource> Repl<S> {
    pub fn new(feed: PostFeed<S>) -> Self {
        Self {
            feed,
            query: ViewQuery::default(),
        }
    }

    fn render(&self) -> String {
        render_table(&self.feed.view(&self.query), &self.query)
    }

    /// Resolve against the unfiltered view so filters can't hide a target.
    fn resolve(&self, raw: &str) -> Result<PostId, ResolveError> {
        resolve_post_id(&self.feed.view(&ViewQuery::default()).posts, raw)
    }

    /// Execute one input line and produce the text to print.
    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        let command = match Command::parse(line) {
            Ok(None) => return Outcome::Continue(String::new()),
            Ok(Some(command)) => command,
            Err(message) => return Outcome::Continue(message),
        };

        let mut out = match command {
            Command::List => self.render(),
            Command::Refresh => {
                // Failures already posted a notice; keep the old view up.
                let _ = self.feed.refresh().await;
                self.render()
            }
            Command::Add(title) => {
                let _ = self.feed.add(&title).await;
                self.render()
            }
            Command::Delete(raw) => match self.resolve(&raw) {
                Ok(id) => {
                    let _ = self.feed.delete(id).await;
                    self.render()
                }
                Err(err) => err.to_string(),
            },
            Command::Title(raw, text) => match self.resolve(&raw) {
                Ok(id) => {
                    let _ = self.feed.set_title(id, &text);
                    self.render()
                }
                Err(err) => err.to_string(),
            },
            Command::Done(raw) => self.set_completed(&raw, true),
            Command::Todo(raw) => self.set_completed(&raw, false),
            Command::Sort(key) => {
                self.query.toggle_sort(key);
                self.render()
            }
            Command::Status(filter) => {
                self.query.status = filter;
                self.render()
            }
            Command::User(filter) => {
                self.query.user = filter;
                self.render()
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Outcome::Quit,
        };

        if let Some(notice) = self.feed.notices().current() {
            let tag = match notice.kind {
                NoticeKind::Success => "[ok]",
                NoticeKind::Error => "[error]",
            };
            out.push_str(&format!("\n{tag} {}", notice.message));
        }
        Outcome::Continue(out)
    }

    fn set_completed(&mut self, raw: &str, completed: bool) -> String {
        match self.resolve(raw) {
            Ok(id) => {
                let _ = self.feed.set_completed(id, completed);
                self.render()
            }
            Err(err) => err.to_string(),
        }
    }

    /// Read-print loop over stdin until `quit` or EOF.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        use tokio::io::{AsyncBufReadExt, BufReader};

        println!("postdeck — type `help` for commands\n");
        let _ = self.feed.refresh().await;
        println!("{}", self.render());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match self.handle_line(&line).await {
                Outcome::Quit => break,
                Outcome::Continue(out) => {
                    if !out.is_empty() {
                        println!("{out}");
                    }
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

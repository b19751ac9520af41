//! Single-slot transient notifications.
//!
//! One notice is visible at a time; posting a new one replaces the current
//! one and restarts its lifetime. Each post returns a token, and
//! [`NoticeBoard::clear_if`] only clears when the token still matches — a
//! dismiss scheduled for an earlier notice can never cut a newer one short.
//!
//! Expiry is deadline-based against the tokio clock, so tests drive it with
//! a paused runtime and `tokio::time::advance`.

use std::time::Duration;

use tokio::time::Instant;

/// Outcome flavor of a notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone)]
struct Slot {
    token: u64,
    notice: Notice,
    expires_at: Instant,
}

/// Holds the currently displayed notice, if any.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    next_token: u64,
    slot: Option<Slot>,
}

impl NoticeBoard {
    /// Matches the original UI's 3-second toast.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_token: 0,
            slot: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Display a notice, replacing any current one. Returns a token scoped
    /// to this notice for use with [`clear_if`](Self::clear_if).
    pub fn post(&mut self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        self.slot = Some(Slot {
            token,
            notice: Notice {
                kind,
                message: message.into(),
            },
            expires_at: Instant::now() + self.ttl,
        });
        token
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.post(NoticeKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.post(NoticeKind::Error, message)
    }

    /// The live notice. `None` once its lifetime has elapsed.
    pub fn current(&self) -> Option<&Notice> {
        self.slot
            .as_ref()
            .filter(|slot| Instant::now() < slot.expires_at)
            .map(|slot| &slot.notice)
    }

    /// Explicit user dismissal.
    pub fn dismiss(&mut self) {
        self.slot = None;
    }

    /// Clear only if `token` still names the displayed notice. Stale timers
    /// hit this path and fall through harmlessly. Returns whether anything
    /// was cleared.
    pub fn clear_if(&mut self, token: u64) -> bool {
        match &self.slot {
            Some(slot) if slot.token == token => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn test_notice_visible_until_ttl() {
        let mut board = NoticeBoard::default();
        board.success("Post added successfully!");

        assert_eq!(
            board.current().map(|n| n.kind),
            Some(NoticeKind::Success)
        );
        advance(Duration::from_secs(2)).await;
        assert!(board.current().is_some());
        advance(Duration::from_secs(2)).await;
        assert!(board.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacement_restarts_lifetime() {
        let mut board = NoticeBoard::default();
        board.success("first");
        advance(Duration::from_secs(2)).await;
        board.error("second");

        // 2s after replacement: the first would have expired by now, the
        // second must still be up.
        advance(Duration::from_secs(2)).await;
        let current = board.current().unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NoticeKind::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_token_cannot_clear_newer_notice() {
        let mut board = NoticeBoard::default();
        let first = board.success("first");
        let _second = board.success("second");

        assert!(!board.clear_if(first));
        assert_eq!(board.current().unwrap().message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_matching_token_clears() {
        let mut board = NoticeBoard::default();
        let token = board.error("oops");
        assert!(board.clear_if(token));
        assert!(board.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_drops_current() {
        let mut board = NoticeBoard::default();
        board.success("bye");
        board.dismiss();
        assert!(board.current().is_none());
    }
}

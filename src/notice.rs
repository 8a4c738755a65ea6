// src/notice.rs
use std::time::{Duration, Instant};

pub const NOTICE_TTL: Duration = Duration::from_millis(4000);
pub const COPIED_HOLD: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        NoticeBoard {
            ttl,
            notices: Vec::new(),
        }
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.push(NoticeKind::Success, message.into(), now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.push(NoticeKind::Error, message.into(), now);
    }

    fn push(&mut self, kind: NoticeKind, message: String, now: Instant) {
        self.notices.push(Notice {
            kind,
            message,
            expires_at: now + self.ttl,
        });
    }

    pub fn expire(&mut self, now: Instant) {
        self.notices.retain(|notice| notice.expires_at > now);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        NoticeBoard::new(NOTICE_TTL)
    }
}

/// Remembers which list entry was copied last, for a short while.
#[derive(Debug, Clone)]
pub struct CopyIndicator {
    hold: Duration,
    copied: Option<(usize, Instant)>,
}

impl CopyIndicator {
    pub fn new(hold: Duration) -> Self {
        CopyIndicator { hold, copied: None }
    }

    /// A newer copy replaces the older mark and restarts the hold.
    pub fn mark(&mut self, id: usize, now: Instant) {
        self.copied = Some((id, now + self.hold));
    }

    pub fn is_copied(&self, id: usize, now: Instant) -> bool {
        matches!(self.copied, Some((copied, until)) if copied == id && now < until)
    }

    pub fn expire(&mut self, now: Instant) {
        if matches!(self.copied, Some((_, until)) if now >= until) {
            self.copied = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.copied.is_some()
    }
}

impl Default for CopyIndicator {
    fn default() -> Self {
        CopyIndicator::new(COPIED_HOLD)
    }
}

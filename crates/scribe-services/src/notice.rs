use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub key: &'static str,
    pub message: String,
    pub raised_at: Instant,
}

/// Holds the most recent user notice until it expires.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    current: Option<Notice>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn raise(&mut self, key: &'static str, message: impl Into<String>) {
        self.raise_at(key, message, Instant::now());
    }

    pub fn raise_at(&mut self, key: &'static str, message: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            key,
            message: message.into(),
            raised_at: now,
        });
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|notice| now.saturating_duration_since(notice.raised_at) < self.ttl)
    }

    /// Last notice raised, expired or not.
    pub fn last(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}

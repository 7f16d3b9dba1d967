//! Transient user-facing notifications.
//!
//! Every notification lands in a bounded history (the one-shot CLI prints it
//! once the command is done) and is raised as a toast that stays active for
//! [`NOTIFICATION_DURATION`]. The REPL prints each toast when it appears and
//! keeps the most severe active one in its prompt until it expires.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::constants::NOTIFICATION_DURATION;

const HISTORY_LIMIT: usize = 32;

/// Raising the same notification again within this window refreshes the
/// active toast instead of stacking a copy.
const DEDUP_WINDOW: Duration = Duration::from_secs(2);

/// Severity, ordered from least to most important
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    /// `✓ Quote added successfully!`
    pub fn line(&self) -> String {
        format!("{} {}", self.level.icon(), self.message)
    }
}

/// A raised notification with its display window. Ids increase monotonically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
    pub raised_at: Instant,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Active toasts in the order they were raised.
#[derive(Debug)]
pub struct ToastBoard {
    lifetime: Duration,
    next_id: u64,
    active: Vec<Toast>,
}

impl Default for ToastBoard {
    fn default() -> Self {
        Self::new(NOTIFICATION_DURATION)
    }
}

impl ToastBoard {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            next_id: 0,
            active: Vec::new(),
        }
    }

    /// Raise `notification` at `now`. Returns the new toast id, or `None` when
    /// an identical toast raised within the dedup window was refreshed instead.
    pub fn raise(&mut self, notification: Notification, now: Instant) -> Option<u64> {
        let expires_at = now + self.lifetime;

        if let Some(existing) = self.active.iter_mut().find(|t| {
            t.notification == notification
                && now.saturating_duration_since(t.raised_at) < DEDUP_WINDOW
        }) {
            existing.expires_at = expires_at;
            return None;
        }

        self.next_id += 1;
        self.active.push(Toast {
            id: self.next_id,
            notification,
            raised_at: now,
            expires_at,
        });
        Some(self.next_id)
    }

    /// Drop toasts whose window has passed. Returns whether any were dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.active.len();
        self.active.retain(|t| !t.is_expired(now));
        self.active.len() != before
    }

    pub fn active(&self) -> &[Toast] {
        &self.active
    }

    /// Active toasts raised after toast `id`
    pub fn since(&self, id: u64) -> impl Iterator<Item = &Toast> {
        self.active.iter().filter(move |t| t.id > id)
    }

    /// The toast worth showing on its own: highest level, newest among equals
    pub fn headline(&self) -> Option<&Toast> {
        self.active
            .iter()
            .max_by(|a, b| {
                a.notification
                    .level
                    .cmp(&b.notification.level)
                    .then(a.id.cmp(&b.id))
            })
    }
}

#[derive(Debug, Default)]
struct NotificationState {
    toasts: ToastBoard,
    history: VecDeque<Notification>,
}

/// Thread-safe notification sink shared by the controller and the sync engine.
#[derive(Debug, Clone, Default)]
pub struct SharedNotifications {
    inner: Arc<Mutex<NotificationState>>,
}

impl SharedNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => tracing::warn!("notify: {}", notification.message),
            _ => tracing::info!("notify: {}", notification.message),
        }

        let mut state = self.inner.lock();
        if state.history.len() == HISTORY_LIMIT {
            state.history.pop_front();
        }
        state.history.push_back(notification.clone());
        state.toasts.raise(notification, Instant::now());
    }

    pub fn expire(&self) -> bool {
        self.inner.lock().toasts.expire(Instant::now())
    }

    pub fn active(&self) -> Vec<Toast> {
        self.inner.lock().toasts.active().to_vec()
    }

    pub fn toasts_since(&self, id: u64) -> Vec<Toast> {
        self.inner.lock().toasts.since(id).cloned().collect()
    }

    pub fn headline(&self) -> Option<Toast> {
        self.inner.lock().toasts.headline().cloned()
    }

    /// Every notification raised, oldest first (bounded)
    pub fn history(&self) -> Vec<Notification> {
        self.inner.lock().history.iter().cloned().collect()
    }

    /// Drain the history, e.g. to print everything raised by one command
    pub fn take_history(&self) -> Vec<Notification> {
        self.inner.lock().history.drain(..).collect()
    }
}

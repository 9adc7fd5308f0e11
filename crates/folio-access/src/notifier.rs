//! # Notifier
//!
//! One injected capability for user-facing messages. The composition root
//! picks the implementation; services only ever call [`Notifier::notify`].

use parking_lot::Mutex;
use serde::Serialize;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Sink for user-facing notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, message: &str) {
        self.notify(Notice::new(NoticeLevel::Success, message));
    }

    fn info(&self, message: &str) {
        self.notify(Notice::new(NoticeLevel::Info, message));
    }

    fn warning(&self, message: &str) {
        self.notify(Notice::new(NoticeLevel::Warning, message));
    }

    fn error(&self, message: &str) {
        self.notify(Notice::new(NoticeLevel::Error, message));
    }
}

/// Target of the events emitted by [`TracingNotifier`].
pub const NOTICE_TARGET: &str = "folio::notice";

/// Forwards notices to `tracing` under [`NOTICE_TARGET`]. Used when no
/// interactive surface exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        let message = notice.message.as_str();
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(target: NOTICE_TARGET, level = %notice.level, message)
            }
            NoticeLevel::Warning => tracing::warn!(target: NOTICE_TARGET, message),
            NoticeLevel::Error => tracing::error!(target: NOTICE_TARGET, message),
        }
    }
}

/// Keeps every notice in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Drain the recorded notices.
    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }

    /// The most recent notice, if any.
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    /// Number of notices at `level`.
    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices.lock().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.success("sent");
        notifier.warning("careful");
        assert_eq!(notifier.count(NoticeLevel::Warning), 1);
        assert_eq!(
            notifier.take(),
            vec![
                Notice::new(NoticeLevel::Success, "sent"),
                Notice::new(NoticeLevel::Warning, "careful"),
            ]
        );
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn usable_as_trait_object() {
        let notifier: Box<dyn Notifier> = Box::new(TracingNotifier);
        notifier.info("hello");
    }
}

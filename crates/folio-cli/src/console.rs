//! Console output for notices.

use folio_access::{Notice, NoticeLevel, Notifier};

/// Writes notices to stderr, one per line, prefixed by level.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}: {}", prefix(notice.level), notice.message);
    }
}

fn prefix(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "OK",
        NoticeLevel::Info => "INFO",
        NoticeLevel::Warning => "WARN",
        NoticeLevel::Error => "ERROR",
    }
}

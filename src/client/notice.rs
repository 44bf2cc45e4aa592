use std::time::Duration;

use tokio::time::Instant;

/// How long a notice stays visible after it was shown.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// One category of transient message. Showing a new message replaces the
/// current one and restarts its lifetime.
#[derive(Debug, Default)]
pub struct NoticeSlot {
    current: Option<(String, Instant)>,
}

impl NoticeSlot {
    pub fn show(&mut self, text: impl Into<String>) {
        self.current = Some((text.into(), Instant::now()));
    }

    /// The active message, if it has not expired yet.
    pub fn message(&self) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < NOTICE_TTL)
            .map(|(text, _)| text.as_str())
    }

    pub fn clear_expired(&mut self) {
        if self.message().is_none() {
            self.current = None;
        }
    }
}

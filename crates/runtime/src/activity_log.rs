use serde::Serialize;

pub const STARTUP_MESSAGE: &str = "Application initialized";

/// One user-visible line in the activity panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    /// 0-based, strictly increasing.
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Append-only, upload-ordered activity log.
///
/// There is no size cap and no removal; adapters poll with [`ActivityLog::since`].
#[derive(Debug, Default, Clone)]
pub struct ActivityLog {
    entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A log that already holds the startup entry.
    pub fn with_startup_entry() -> Self {
        let mut log = Self::new();
        log.append("startup", STARTUP_MESSAGE);
        log
    }

    pub fn append(&mut self, kind: &'static str, message: impl Into<String>) -> u64 {
        let seq = self.entries.len() as u64;
        let message = message.into();
        tracing::debug!(seq, kind, %message, "activity");
        self.entries.push(ActivityEntry {
            seq,
            kind,
            message,
        });
        seq
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with `seq >= seq`.
    pub fn since(&self, seq: u64) -> &[ActivityEntry] {
        let start = (seq as usize).min(self.entries.len());
        &self.entries[start..]
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.message.as_str())
    }
}

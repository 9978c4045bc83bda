//! Per-item migration log and progress.

use chrono::{DateTime, Utc};
use serde::Serialize;
use socialmigrate_core::Post;
use uuid::Uuid;

/// Status of one migrated item. Only moves forward:
/// `pending -> migrating -> success | error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Migrating,
    Success,
    Error,
}

impl ItemStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Migrating => "migrating",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Migrating) | (Self::Migrating, Self::Success | Self::Error)
        )
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub post_id: String,
    pub content_preview: String,
    status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl LogEntry {
    fn pending(post: &Post) -> Self {
        Self {
            post_id: post.id.clone(),
            content_preview: post.content_preview(),
            status: ItemStatus::Pending,
            error: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> ItemStatus {
        self.status
    }

    /// Upstream failure message. Present only with [`ItemStatus::Error`].
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Completed-over-total counter. Serializes with its derived `percent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Percentage of items in a terminal status. Exactly `100.0` once every
    /// item is done; `0.0` for an empty run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        if self.completed >= self.total {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

impl Serialize for Progress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Progress", 3)?;
        state.serialize_field("completed", &self.completed)?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("percent", &self.percent())?;
        state.end()
    }
}

/// One entry per frozen post, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationLog {
    entries: Vec<LogEntry>,
}

impl MigrationLog {
    /// A log with every item pending.
    #[must_use]
    pub fn pending_for(posts: &[Post]) -> Self {
        Self {
            entries: posts.iter().map(LogEntry::pending).collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move entry `index` to [`ItemStatus::Migrating`].
    pub fn mark_migrating(&mut self, index: usize) -> bool {
        self.advance(index, ItemStatus::Migrating, None)
    }

    pub fn mark_success(&mut self, index: usize) -> bool {
        self.advance(index, ItemStatus::Success, None)
    }

    pub fn mark_error(&mut self, index: usize, message: impl Into<String>) -> bool {
        self.advance(index, ItemStatus::Error, Some(message.into()))
    }

    /// Apply a status change if it moves forward. Returns `false`, leaving
    /// the entry untouched, for an unknown index or a backwards move.
    fn advance(&mut self, index: usize, next: ItemStatus, error: Option<String>) -> bool {
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        if !entry.status.can_advance_to(next) {
            tracing::warn!(
                post_id = %entry.post_id,
                from = %entry.status,
                to = %next,
                "ignoring backwards log transition"
            );
            return false;
        }
        entry.status = next;
        entry.error = error;
        true
    }

    #[must_use]
    pub fn count(&self, status: ItemStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self
                .entries
                .iter()
                .filter(|e| e.status.is_terminal())
                .count(),
            total: self.entries.len(),
        }
    }
}

/// Summary of a finished migration run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub run_id: Uuid,
    pub destination_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub entries: Vec<LogEntry>,
}

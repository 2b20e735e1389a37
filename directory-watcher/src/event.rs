//! Change events produced by the poll loop.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A change observed between two successive directory snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The kind of change.
    pub kind: ChangeKind,

    /// Path to the affected file.
    pub path: PathBuf,

    /// When the change was observed.
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Create a new change event.
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Kind of change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// File appeared since the previous snapshot.
    Add,

    /// File's modification time differs from the previous snapshot.
    Change,

    /// File disappeared from the snapshot (deleted, or no longer matches
    /// the filter).
    Unlink,
}

impl ChangeKind {
    /// The wire discriminator consumed by the host ("add", "change",
    /// "unlink").
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Change => "change",
            Self::Unlink => "unlink",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivers change events to the consumer.
///
/// The handler is invoked on the watcher's worker thread, one event at a
/// time. The poll loop does not advance until `handle_event` returns, so a
/// slow consumer directly gates the next poll cycle. That bounds memory at
/// the cost of throughput.
pub trait EventHandler: Send + 'static {
    /// Process one event.
    fn handle_event(&mut self, event: ChangeEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(ChangeEvent) + Send + 'static,
{
    fn handle_event(&mut self, event: ChangeEvent) {
        self(event)
    }
}

/// Blocking delivery into a bounded channel. The send blocks the worker
/// thread while the channel is full, which applies backpressure to the
/// poll loop when the consumer falls behind.
impl EventHandler for tokio::sync::mpsc::Sender<ChangeEvent> {
    fn handle_event(&mut self, event: ChangeEvent) {
        if self.blocking_send(event).is_err() {
            warn!("event receiver dropped, discarding event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_change_event_creation() {
        let event = ChangeEvent::new(ChangeKind::Add, "/themes/main.css");
        assert_eq!(event.kind, ChangeKind::Add);
        assert_eq!(event.path, Path::new("/themes/main.css"));
    }

    #[test]
    fn test_kind_discriminators() {
        assert_eq!(ChangeKind::Add.as_str(), "add");
        assert_eq!(ChangeKind::Change.as_str(), "change");
        assert_eq!(ChangeKind::Unlink.as_str(), "unlink");
        assert_eq!(ChangeKind::Unlink.to_string(), "unlink");
    }

    #[test]
    fn test_kind_serialization_matches_wire_format() {
        let json = serde_json::to_string(&ChangeKind::Unlink).unwrap();
        assert_eq!(json, "\"unlink\"");

        let event = ChangeEvent::new(ChangeKind::Change, "/themes/app.js");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"change\""));
    }

    #[test]
    fn test_closure_handler() {
        use std::sync::{Arc, Mutex};

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut handler = move |event: ChangeEvent| sink.lock().unwrap().push(event.kind);
        handler.handle_event(ChangeEvent::new(ChangeKind::Add, "/a.js"));
        handler.handle_event(ChangeEvent::new(ChangeKind::Unlink, "/a.js"));
        assert_eq!(*seen.lock().unwrap(), vec![ChangeKind::Add, ChangeKind::Unlink]);
    }
}

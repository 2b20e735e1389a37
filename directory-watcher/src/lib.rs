//! # Directory Watcher
//!
//! This crate provides polling-based change detection for theme asset
//! directories. A background worker snapshots the watched subtree on a
//! fixed interval, diffs successive snapshots, and reports added, changed,
//! and removed files to the consumer.
//!
//! ## Features
//!
//! - **Poll-and-diff detection**: no OS notification APIs, so behavior is
//!   identical across platforms and network filesystems
//! - **Filtered snapshots**: only theme asset files (`.js`, `.css`) are
//!   tracked by default
//! - **Fault tolerance**: unreadable entries are skipped and an unreadable
//!   root degrades to an empty snapshot, never a crash
//! - **Backpressure**: event delivery blocks the poll loop until the
//!   consumer is done
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Directory Watcher                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  WatchConfig ──► WatchLoop ──► ChangeEvent                      │
//! │       │             │              │                            │
//! │       ▼             ▼              ▼                            │
//! │  PathFilter   TreeSnapshotter  EventHandler                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod event;
pub mod filter;
pub mod snapshot;
pub mod watcher;

pub use config::WatchConfig;
pub use diff::diff_snapshots;
pub use error::{Result, WatcherError};
pub use event::{ChangeEvent, ChangeKind, EventHandler};
pub use filter::{PathFilter, THEME_ASSET_EXTENSIONS};
pub use snapshot::{Snapshot, TreeSnapshotter};
pub use watcher::{DirectoryWatcher, watch};

//! Directory watcher implementation.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::diff::diff_snapshots;
use crate::error::Result;
use crate::event::{ChangeEvent, EventHandler};
use crate::filter::PathFilter;
use crate::snapshot::{Snapshot, TreeSnapshotter};

/// Handle to a running watch.
///
/// Each watch owns one dedicated worker thread that polls the target
/// subtree: sleep for the interval, snapshot, diff against the previous
/// snapshot, deliver the resulting events, repeat. The registering call
/// returns as soon as the worker starts.
///
/// Dropping the handle signals the worker to stop at its next wakeup
/// without waiting for it; [`DirectoryWatcher::stop`] also joins the
/// worker, and [`DirectoryWatcher::detach`] lets it run until the process
/// exits.
pub struct DirectoryWatcher {
    /// Canonicalized watch root.
    root: PathBuf,

    /// Stop signal into the worker.
    shutdown: Option<Sender<()>>,

    /// The worker thread.
    worker: Option<JoinHandle<()>>,
}

impl DirectoryWatcher {
    /// Start watching `config.root`, delivering events to `handler`.
    ///
    /// Malformed arguments are rejected here, before any thread is
    /// spawned. A root that does not exist yet is accepted: the initial
    /// snapshot is empty and matching files created later are reported as
    /// adds.
    pub fn spawn<H: EventHandler>(config: WatchConfig, handler: H) -> Result<Self> {
        config.validate()?;

        // Best-effort: a root that cannot be resolved yet is watched under
        // the name the caller gave.
        let root = config
            .root
            .canonicalize()
            .unwrap_or_else(|_| config.root.clone());

        let filter = PathFilter::new(config.extensions.iter().map(String::as_str));
        let mut snapshotter = TreeSnapshotter::new(root.clone(), filter);
        if let Some(depth) = config.max_depth {
            snapshotter = snapshotter.with_max_depth(depth);
        }
        if config.follow_symlinks {
            snapshotter = snapshotter.follow_symlinks();
        }

        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let session = WatchSession {
            root: root.clone(),
            interval: config.interval,
            snapshotter,
            handler,
            shutdown: shutdown_rx,
            previous: Snapshot::new(),
        };

        let worker = thread::Builder::new()
            .name("directory-watcher".to_string())
            .spawn(move || session.run())?;

        info!(
            "watch started on {} (interval {:?})",
            root.display(),
            config.interval
        );

        Ok(Self {
            root,
            shutdown: Some(shutdown_tx),
            worker: Some(worker),
        })
    }

    /// Start watching and deliver events into a bounded channel.
    ///
    /// The worker blocks while the channel is full, so a small capacity
    /// directly throttles the poll loop.
    pub fn channel(
        config: WatchConfig,
        capacity: usize,
    ) -> Result<(Self, tokio::sync::mpsc::Receiver<ChangeEvent>)> {
        let (event_tx, event_rx) = tokio::sync::mpsc::channel(capacity.max(1));
        let watcher = Self::spawn(config, event_tx)?;
        Ok((watcher, event_rx))
    }

    /// The canonicalized root this watch observes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the worker thread is still running.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Stop the watch and wait for the worker to exit.
    ///
    /// The stop signal interrupts the interval sleep and is observed
    /// before each event dispatch, so at most one in-flight handler call
    /// delays the join.
    pub fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("watch worker for {} panicked", self.root.display());
            }
        }
    }

    /// Release the worker to run for the remainder of the process
    /// lifetime. The watch can no longer be stopped afterwards.
    pub fn detach(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // Keep the channel open forever so the worker never observes a
            // disconnect.
            std::mem::forget(shutdown);
        }
        self.worker.take();
    }
}

/// Start watching `root`, invoking `on_event` for every observed change.
///
/// Registration returns immediately after the worker starts; the callback
/// runs on the worker thread.
pub fn watch<F>(
    root: impl Into<PathBuf>,
    interval: Duration,
    on_event: F,
) -> Result<DirectoryWatcher>
where
    F: FnMut(ChangeEvent) + Send + 'static,
{
    DirectoryWatcher::spawn(WatchConfig::new(root).with_interval(interval), on_event)
}

/// Worker-side state of one watch. Owned entirely by the worker thread.
struct WatchSession<H: EventHandler> {
    root: PathBuf,
    interval: Duration,
    snapshotter: TreeSnapshotter,
    handler: H,
    shutdown: Receiver<()>,
    previous: Snapshot,
}

impl<H: EventHandler> WatchSession<H> {
    /// The poll loop. The initial snapshot establishes the baseline and
    /// emits nothing; every later cycle reports the differences against
    /// the previous one.
    fn run(mut self) {
        self.previous = self.snapshotter.snapshot();
        debug!(
            "initial snapshot of {} holds {} files",
            self.root.display(),
            self.previous.len()
        );

        loop {
            match self.shutdown.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let cycle_start = Instant::now();
            let current = self.snapshotter.snapshot();
            let events = diff_snapshots(&self.previous, &current);
            debug!(
                "poll cycle on {}: {} files, {} events in {:?}",
                self.root.display(),
                current.len(),
                events.len(),
                cycle_start.elapsed()
            );

            for event in events {
                if self.stop_requested() {
                    info!("watch on {} stopped", self.root.display());
                    return;
                }
                self.handler.handle_event(event);
            }

            self.previous = current;
        }

        info!("watch on {} stopped", self.root.display());
    }

    fn stop_requested(&self) -> bool {
        !matches!(self.shutdown.try_recv(), Err(TryRecvError::Empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[test]
    fn test_invalid_config_is_rejected_before_spawn() {
        let config = WatchConfig::new("/themes").with_interval(Duration::ZERO);
        let result = DirectoryWatcher::spawn(config, |_event: ChangeEvent| {});
        assert!(result.is_err());
    }

    #[test]
    fn test_spawn_and_stop() {
        let temp_dir = TempDir::new().unwrap();
        let dispatched = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&dispatched);

        let config =
            WatchConfig::new(temp_dir.path()).with_interval(Duration::from_millis(10));
        let watcher = DirectoryWatcher::spawn(config, move |_event: ChangeEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert!(watcher.is_running());
        thread::sleep(Duration::from_millis(50));
        watcher.stop();

        // Nothing changed under the root, so nothing was dispatched.
        assert_eq!(dispatched.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_interrupts_long_interval() {
        let temp_dir = TempDir::new().unwrap();
        let config = WatchConfig::new(temp_dir.path()).with_interval(Duration::from_secs(3600));
        let watcher = DirectoryWatcher::spawn(config, |_event: ChangeEvent| {}).unwrap();

        let started = Instant::now();
        watcher.stop();
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_missing_root_spawns() {
        let temp_dir = TempDir::new().unwrap();
        let config = WatchConfig::new(temp_dir.path().join("not-yet"))
            .with_interval(Duration::from_millis(10));
        let watcher = DirectoryWatcher::spawn(config, |_event: ChangeEvent| {}).unwrap();

        assert!(watcher.is_running());
        watcher.stop();
    }
}

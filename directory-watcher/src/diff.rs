//! Snapshot diffing.

use crate::event::{ChangeEvent, ChangeKind};
use crate::snapshot::Snapshot;

/// Classify every path across two snapshots into add, change, or unlink
/// events. Paths present in both snapshots with an equal modification time
/// produce nothing.
///
/// All add and change events precede all unlink events, so consumers that
/// rebuild derived state can apply removals last. Order among events of the
/// same phase is unspecified. Timestamps are compared for exact equality;
/// filesystems with coarse timestamp resolution may fold rapid successive
/// edits into one tick and report no change for the later ones.
pub fn diff_snapshots(previous: &Snapshot, current: &Snapshot) -> Vec<ChangeEvent> {
    let mut events = Vec::new();

    for (path, modified) in current {
        match previous.get(path) {
            None => events.push(ChangeEvent::new(ChangeKind::Add, path.clone())),
            Some(prev_modified) if prev_modified != modified => {
                events.push(ChangeEvent::new(ChangeKind::Change, path.clone()));
            }
            Some(_) => {}
        }
    }

    for path in previous.keys() {
        if !current.contains_key(path) {
            events.push(ChangeEvent::new(ChangeKind::Unlink, path.clone()));
        }
    }

    events
}

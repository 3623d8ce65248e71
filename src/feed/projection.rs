use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::internal::models::{FetchPhase, Movie};

/// One observable state of the feed, published on every accepted transition:
/// the reset after a navigation, each successful page append, and a failure.
/// `movies` is always the full accumulated list, never a delta.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub movies: Vec<Movie>,
    pub phase: FetchPhase,
    pub error: Option<Arc<anyhow::Error>>,
}

/// Fan-out of snapshots to observers.
///
/// Publishing happens inside the controller task, so every observer sees the
/// same snapshots in the same order. An observer whose receiver has been
/// dropped is pruned on the next publish.
#[derive(Debug, Default)]
pub struct SnapshotHub {
    observers: Vec<UnboundedSender<FeedSnapshot>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register an observer and hand it the current snapshot right away, so
    /// late subscribers start from live state rather than from nothing.
    pub fn subscribe(&mut self, observer: UnboundedSender<FeedSnapshot>, current: FeedSnapshot) {
        if observer.send(current).is_ok() {
            self.observers.push(observer);
        }
    }

    pub fn publish(&mut self, snapshot: FeedSnapshot) {
        self.observers
            .retain(|observer| observer.send(snapshot.clone()).is_ok());
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

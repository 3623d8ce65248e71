use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::feed::projection::{FeedSnapshot, SnapshotHub};
use crate::feed::resolver::{QueryDescriptor, RouteParams};
use crate::feed::state::FeedState;
use crate::internal::models::Movie;

/// One asynchronous page request against the remote catalog.
///
/// Implementations must be idempotent and side-effect-free as far as the
/// controller is concerned; a failed page is never retried, it is reported
/// and the feed freezes until the next navigation.
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    async fn fetch_page(&self, descriptor: &QueryDescriptor, page: u32) -> Result<Vec<Movie>>;
}

/// Messages drained by the controller's run loop. Navigation and load-more
/// signals arrive from outside through [`FeedHandle`]; page completions are
/// sent back by the spawned fetch tasks, tagged with the generation that was
/// live when the fetch was issued.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Navigated(RouteParams),
    LoadMore,
    PageLoaded {
        generation: u64,
        page: u32,
        movies: Vec<Movie>,
    },
    PageFailed {
        generation: u64,
        page: u32,
        error: Arc<anyhow::Error>,
    },
    Subscribe(UnboundedSender<FeedSnapshot>),
}

/// Input side of a controller. Cheap to clone; every method is a
/// fire-and-forget send, and all of them become no-ops once the controller
/// has been disposed.
#[derive(Debug, Clone)]
pub struct FeedHandle {
    event_tx: UnboundedSender<FeedEvent>,
    cancel: CancellationToken,
}

impl FeedHandle {
    /// Feed one navigation event into the controller. An event resolving to
    /// the descriptor already being browsed is ignored; anything else
    /// restarts the feed and fetches page 1 immediately.
    pub fn navigate(&self, params: RouteParams) {
        let _ = self.event_tx.send(FeedEvent::Navigated(params));
    }

    /// Request the next page. Dropped, not queued, when a fetch is already
    /// outstanding or the feed is in the failed phase.
    pub fn load_more(&self) {
        let _ = self.event_tx.send(FeedEvent::LoadMore);
    }

    /// Subscribe to the snapshot stream. The receiver first gets the current
    /// snapshot, then one snapshot per accepted transition, in order. After
    /// dispose the receiver simply ends.
    pub fn observe(&self) -> UnboundedReceiver<FeedSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = self.event_tx.send(FeedEvent::Subscribe(tx));
        rx
    }

    /// Tear the controller down. The run loop exits, observers' streams end,
    /// and any still-outstanding fetch completes into a closed channel, so a
    /// late result cannot touch state that no longer exists.
    pub fn dispose(&self) {
        self.cancel.cancel();
    }
}

/// The paginated-feed state machine.
///
/// All transitions happen on the task driving [`run`](Self::run): navigation
/// restarts the feed and fetches page 1 unconditionally; load-more triggers
/// advance one page at a time with drop-based backpressure; completions are
/// applied only when their generation is still live. Fetches run on spawned
/// tasks and report back through the event channel, so the state itself is
/// never shared and never locked.
pub struct FeedController<F: PageFetcher> {
    state: FeedState,
    current: FeedSnapshot,
    hub: SnapshotHub,
    fetcher: Arc<F>,
    event_tx: UnboundedSender<FeedEvent>,
    event_rx: UnboundedReceiver<FeedEvent>,
    cancel: CancellationToken,
}

impl<F: PageFetcher> FeedController<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            state: FeedState::new(),
            current: FeedSnapshot::default(),
            hub: SnapshotHub::new(),
            fetcher,
            event_tx,
            event_rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn handle(&self) -> FeedHandle {
        FeedHandle {
            event_tx: self.event_tx.clone(),
            cancel: self.cancel.clone(),
        }
    }

    /// Spawn the controller onto the runtime and return its handle.
    pub fn spawn(fetcher: Arc<F>) -> FeedHandle {
        let controller = Self::new(fetcher);
        let handle = controller.handle();
        tokio::spawn(controller.run());
        handle
    }

    /// Drive the controller until it is disposed.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
            }
        }
    }

    fn handle_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Navigated(params) => self.on_navigated(params),
            FeedEvent::LoadMore => self.on_load_more(),
            FeedEvent::PageLoaded {
                generation,
                page,
                movies,
            } => self.on_page_loaded(generation, page, movies),
            FeedEvent::PageFailed {
                generation,
                page,
                error,
            } => self.on_page_failed(generation, page, error),
            FeedEvent::Subscribe(observer) => self.hub.subscribe(observer, self.current.clone()),
        }
    }

    fn on_navigated(&mut self, params: RouteParams) {
        let descriptor = QueryDescriptor::resolve(&params);
        if self.state.descriptor.as_ref() == Some(&descriptor) {
            // Repeat navigation to the feed already on screen
            return;
        }

        // A navigation restarts unconditionally, whatever the phase: the
        // bumped generation retires the in-flight fetch, and page 1 goes out
        // right away rather than waiting for a visibility trigger.
        let generation = self.state.restart(descriptor.clone());
        tracing::info!(mode = %descriptor.mode, key = %descriptor.key, generation, "feed restarted");
        self.publish(None);
        self.issue_fetch();
    }

    fn on_load_more(&mut self) {
        // Triggers landing while a fetch is outstanding (or after a failure)
        // are dropped, not queued: the next accepted trigger fetches whatever
        // `next_page` is at acceptance time.
        if !self.state.accept_trigger() {
            return;
        }
        self.issue_fetch();
    }

    fn on_page_loaded(&mut self, generation: u64, page: u32, movies: Vec<Movie>) {
        if !self.state.is_current(generation) {
            // Completion of a superseded descriptor. The replacing feed has
            // already reset what is visible, so this vanishes without a log
            // or a snapshot.
            return;
        }
        let count = movies.len();
        self.state.append_page(movies);
        tracing::debug!(page, count, total = self.state.movies.len(), "page appended");
        self.publish(None);
    }

    fn on_page_failed(&mut self, generation: u64, page: u32, error: Arc<anyhow::Error>) {
        if !self.state.is_current(generation) {
            return;
        }
        tracing::error!(page, error = %error, "page fetch failed");
        self.state.fail();
        self.publish(Some(error));
    }

    /// Send the page request for the live descriptor and `next_page`. The
    /// spawned task tags its completion with the generation at issue time;
    /// by the time it lands the tag may already be stale, which is exactly
    /// how a superseded fetch gets cancelled.
    fn issue_fetch(&self) {
        let Some(descriptor) = self.state.descriptor.clone() else {
            return;
        };
        let generation = self.state.generation;
        let page = self.state.next_page;
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match fetcher.fetch_page(&descriptor, page).await {
                Ok(movies) => {
                    let _ = tx.send(FeedEvent::PageLoaded {
                        generation,
                        page,
                        movies,
                    });
                }
                Err(error) => {
                    let _ = tx.send(FeedEvent::PageFailed {
                        generation,
                        page,
                        error: Arc::new(error),
                    });
                }
            }
        });
    }

    fn publish(&mut self, error: Option<Arc<anyhow::Error>>) {
        self.current = FeedSnapshot {
            movies: self.state.movies.clone(),
            phase: self.state.phase,
            error,
        };
        self.hub.publish(self.current.clone());
    }
}

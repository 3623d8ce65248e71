use crate::feed::resolver::QueryDescriptor;
use crate::internal::models::{FetchPhase, Movie};

/// Pagination state of one feed, owned exclusively by the controller task.
///
/// `generation` counts descriptor lifetimes: it is bumped on every restart,
/// and a page completion is only applied when it still carries the live
/// generation. That comparison is the whole cancellation mechanism; the
/// underlying request is never aborted, its result just stops mattering.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub descriptor: Option<QueryDescriptor>,
    pub movies: Vec<Movie>,
    pub next_page: u32,
    pub phase: FetchPhase,
    pub generation: u64,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            descriptor: None,
            movies: Vec::new(),
            next_page: 1,
            phase: FetchPhase::Idle,
            generation: 0,
        }
    }

    /// Install a new descriptor: clear the accumulated list, rewind to page
    /// 1, mark a fetch outstanding and retire every in-flight request by
    /// bumping the generation. Returns the fresh generation.
    pub fn restart(&mut self, descriptor: QueryDescriptor) -> u64 {
        self.generation += 1;
        self.descriptor = Some(descriptor);
        self.movies.clear();
        self.next_page = 1;
        self.phase = FetchPhase::Fetching;
        self.generation
    }

    /// Whether a completion tagged with `generation` belongs to the live
    /// descriptor.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Accept a load-more trigger if the feed can take one: a descriptor is
    /// installed and nothing is outstanding. On acceptance the phase flips
    /// to `Fetching`; the caller must issue the fetch for `next_page`.
    pub fn accept_trigger(&mut self) -> bool {
        if self.descriptor.is_some() && self.phase == FetchPhase::Idle {
            self.phase = FetchPhase::Fetching;
            true
        } else {
            false
        }
    }

    /// Append one resolved page and return to idle. Pages arrive strictly
    /// in order because only one fetch per generation is ever outstanding.
    pub fn append_page(&mut self, movies: Vec<Movie>) {
        self.movies.extend(movies);
        self.next_page += 1;
        self.phase = FetchPhase::Idle;
    }

    /// Record a failed fetch. Accumulated movies stay visible; only a
    /// restart leaves this phase.
    pub fn fail(&mut self) {
        self.phase = FetchPhase::Failed;
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

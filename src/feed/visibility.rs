use futures::{Stream, StreamExt};

use crate::feed::controller::FeedHandle;

/// Bridge a sentinel-visibility signal onto the feed.
///
/// The UI reports every visibility change of its end-of-list sentinel, both
/// entering and leaving the viewport. Only the entering edge means anything
/// here: each `true` becomes a load-more trigger, every `false` is dropped.
/// The task ends when the signal stream does.
pub async fn forward_visibility<S>(mut signals: S, handle: FeedHandle)
where
    S: Stream<Item = bool> + Unpin,
{
    while let Some(visible) = signals.next().await {
        if visible {
            handle.load_more();
        }
    }
}

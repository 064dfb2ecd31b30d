//! Multi-source loading with skip-on-failure semantics.

use chrono::Duration;
use tracing::warn;

use crate::cache::{CalendarCache, EventSource};
use crate::error::{InkCalError, InkCalResult};
use crate::event::Event;
use crate::merge::merge;

/// Load every requested source through the cache and merge the results.
///
/// An unavailable source is logged and skipped; partial results are
/// expected and fine. Only when every requested source fails does this
/// return `EmptyResult`. Requesting no sources is an empty success.
pub async fn collect_events<S: EventSource>(
    cache: &CalendarCache<S>,
    source_ids: &[String],
    ttl: Duration,
) -> InkCalResult<Vec<Event>> {
    if source_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut batches = Vec::new();
    for source_id in source_ids {
        match cache.get(source_id, ttl).await {
            Ok(events) => batches.push(events),
            Err(e) => warn!(%source_id, error = %e, "skipping unavailable source"),
        }
    }

    if batches.is_empty() {
        return Err(InkCalError::EmptyResult);
    }
    Ok(merge(batches))
}

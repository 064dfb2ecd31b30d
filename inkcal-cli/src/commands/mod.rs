pub mod refresh;
pub mod timeline;
pub mod upcoming;

use std::time::Duration as StdDuration;

use anyhow::Result;
use inkcal_core::cache::CalendarCache;
use inkcal_core::event::{Event, Occurrence};
use inkcal_core::recurrence;
use inkcal_core::window::TimeWindow;
use tracing::warn;

use crate::config::Config;
use crate::http::HttpEventSource;

/// Build the TTL cache over the configured HTTP sources.
pub(crate) fn build_cache(config: &Config) -> Result<CalendarCache<HttpEventSource>> {
    let source = HttpEventSource::new(
        &config.sources,
        StdDuration::from_secs(config.fetch_timeout_secs),
    )?;
    Ok(CalendarCache::new(Config::cache_dir()?, source))
}

pub(crate) fn source_ids(config: &Config) -> Vec<String> {
    config.sources.iter().map(|s| s.name.clone()).collect()
}

/// Expand every event against the window. An event with a broken rule is
/// logged and skipped; it never takes the run down with it.
pub(crate) fn expand_all<'a>(events: &'a [Event], window: &TimeWindow) -> Vec<Occurrence<'a>> {
    let mut occurrences = Vec::new();
    for event in events {
        match recurrence::expand(event, window) {
            Ok(occs) => occurrences.extend(occs),
            Err(e) => warn!(event_id = %event.id, error = %e, "skipping event"),
        }
    }
    occurrences
}

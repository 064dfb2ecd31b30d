//! RRULE expansion for recurring events.
//!
//! Expands a master recurring event into concrete occurrences within a
//! bounded window. The rule generator is never advanced past the window
//! end, so infinite rules are safe to expand.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;
use tracing::debug;

use crate::error::{InkCalError, InkCalResult};
use crate::event::{Event, EventTime, Occurrence, Recurrence};
use crate::window::TimeWindow;

/// Hard cap on generated instances per rule. The window bound is the real
/// limit; this guards against pathological rules inside huge windows.
const MAX_INSTANCES: u16 = 512;

/// Expand `event` into the occurrences intersecting `window`.
///
/// - No recurrence rule: a single occurrence `(start, end)` iff the event
///   overlaps the window, else none.
/// - With a rule: every instance start in `[window.start, window.end]`,
///   both boundaries inclusive, each occurrence keeping the master's
///   exact duration.
///
/// Naive event times are interpreted in the window's zone.
pub fn expand<'a>(event: &'a Event, window: &TimeWindow) -> InkCalResult<Vec<Occurrence<'a>>> {
    let zone = window.zone;
    let (Some(start), Some(end)) = (event.start.resolve(zone), event.end.resolve(zone)) else {
        debug!(event_id = %event.id, "skipping event with unresolvable times");
        return Ok(Vec::new());
    };
    if end <= start {
        debug!(event_id = %event.id, "skipping event with non-positive duration");
        return Ok(Vec::new());
    }

    let Some(recurrence) = &event.recurrence else {
        if window.intersects(start, end) {
            return Ok(vec![Occurrence { event, start, end }]);
        }
        return Ok(Vec::new());
    };

    let duration = end - start;
    let rrule_str = build_rrule_string(&event.start, recurrence, zone);
    let rrule_set = rrule_str
        .parse::<RRuleSet>()
        .map_err(|e| InkCalError::Rrule {
            event_id: event.id.clone(),
            reason: e.to_string(),
        })?;

    // after/before are exclusive; widen by a second so instances landing
    // exactly on a window boundary are kept (start == window.end counts).
    let after = (window.start() - Duration::seconds(1)).with_timezone(&rrule::Tz::UTC);
    let before = (window.end() + Duration::seconds(1)).with_timezone(&rrule::Tz::UTC);
    let result = rrule_set.after(after).before(before).all(MAX_INSTANCES);

    let mut occurrences = Vec::new();
    for dt in &result.dates {
        let s = dt.with_timezone(&Utc);
        if s < window.start() || s > window.end() {
            continue;
        }
        occurrences.push(Occurrence {
            event,
            start: s,
            end: s + duration,
        });
    }
    Ok(occurrences)
}

/// Build an iCalendar-format rule block for the rrule crate parser.
fn build_rrule_string(start: &EventTime, recurrence: &Recurrence, zone: Tz) -> String {
    let mut lines = vec![
        format_time_line("DTSTART", start, zone),
        format!("RRULE:{}", recurrence.rrule),
    ];
    for exdate in &recurrence.exdates {
        lines.push(format_time_line("EXDATE", exdate, zone));
    }
    lines.join("\n")
}

fn format_time_line(name: &str, time: &EventTime, zone: Tz) -> String {
    match time {
        EventTime::Utc(dt) => format!("{name}:{}", dt.format("%Y%m%dT%H%M%SZ")),
        EventTime::Floating(dt) => format!(
            "{name};TZID={}:{}",
            zone.name(),
            dt.format("%Y%m%dT%H%M%S")
        ),
        EventTime::Date(d) => {
            format!("{name};TZID={}:{}T000000", zone.name(), d.format("%Y%m%d"))
        }
        EventTime::Zoned { datetime, tzid } => {
            format!("{name};TZID={tzid}:{}", datetime.format("%Y%m%dT%H%M%S"))
        }
    }
}

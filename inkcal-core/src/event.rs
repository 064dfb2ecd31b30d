//! Source-neutral event types.
//!
//! Upstream calendar formats disagree on how they represent time (UTC,
//! zoned, floating, all-day dates) and on which attributes exist. The
//! adapter in `ics` converts everything into these types; the rest of the
//! crate never inspects a source-library shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A point in time as written in the source calendar.
///
/// `Floating` and `Date` carry no zone of their own; they are interpreted
/// in a reference zone (normally the render window's zone) at resolution
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    /// Absolute instant (`DTSTART:...Z`)
    Utc(DateTime<Utc>),
    /// Naive local time with no zone attached
    Floating(NaiveDateTime),
    /// All-day date (`VALUE=DATE`)
    Date(NaiveDate),
    /// Naive local time plus an IANA zone id (`TZID=...`)
    Zoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    /// Resolve to an absolute instant, interpreting naive times in `zone`.
    ///
    /// Returns `None` for local times that do not exist in the relevant
    /// zone (DST gaps); callers skip such events rather than guess.
    pub fn resolve(&self, zone: Tz) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Utc(dt) => Some(*dt),
            EventTime::Floating(naive) => local_to_utc(zone, naive),
            EventTime::Date(d) => local_to_utc(zone, &d.and_hms_opt(0, 0, 0)?),
            EventTime::Zoned { datetime, tzid } => {
                // Unknown TZID falls back to the reference zone.
                let tz: Tz = tzid.parse().unwrap_or(zone);
                local_to_utc(tz, datetime)
            }
        }
    }
}

fn local_to_utc(zone: Tz, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Recurrence specification attached to a master event.
///
/// The RRULE text is opaque to everything except `recurrence::expand`,
/// which hands it to the rrule crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    /// RRULE value, e.g. `FREQ=WEEKLY;BYDAY=MO`
    pub rrule: String,
    /// Excluded instance start times (EXDATE)
    pub exdates: Vec<EventTime>,
}

/// A calendar event as parsed from one source.
///
/// Immutable once parsed; owned by the cache entry of the source that
/// produced it until merged into a combined stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub recurrence: Option<Recurrence>,
    /// Identifier of the source this event came from
    pub source_id: String,
}

impl Event {
    pub fn all_day(&self) -> bool {
        matches!(self.start, EventTime::Date(_))
    }
}

/// One concrete time-bounded instantiation of an event: the event itself
/// for non-recurring events, or one expansion of its rule.
///
/// Holds a read-only back-reference for label/lookup purposes; occurrences
/// are created transiently per layout or selection call and never persisted.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    pub event: &'a Event,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Chicago;

    #[test]
    fn test_floating_time_resolves_in_reference_zone() {
        let time = EventTime::Floating(
            NaiveDate::from_ymd_opt(2025, 3, 20)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );

        let resolved = time.resolve(Chicago).expect("should resolve");
        // 09:00 CDT == 14:00 UTC
        assert_eq!(resolved, Utc.with_ymd_and_hms(2025, 3, 20, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_zoned_time_uses_its_own_tzid() {
        let time = EventTime::Zoned {
            datetime: NaiveDate::from_ymd_opt(2025, 3, 20)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            tzid: "Europe/Stockholm".to_string(),
        };

        let resolved = time.resolve(Chicago).expect("should resolve");
        // 09:00 CET == 08:00 UTC, regardless of the reference zone
        assert_eq!(resolved, Utc.with_ymd_and_hms(2025, 3, 20, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_all_day_date_resolves_to_local_midnight() {
        let time = EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());

        let resolved = time.resolve(Chicago).expect("should resolve");
        assert_eq!(resolved, Utc.with_ymd_and_hms(2025, 3, 20, 5, 0, 0).unwrap());
    }
}

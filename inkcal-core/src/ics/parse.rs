//! ICS feed parsing using the icalendar crate's parser.
//!
//! This is deliberately lenient: a VEVENT that cannot be given usable
//! times is dropped with a debug log instead of failing the whole feed.
//! Only an unreadable calendar (no VCALENDAR grammar at all) is an error.

use chrono::Duration;
use icalendar::{
    DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::debug;

use crate::error::{InkCalError, InkCalResult};
use crate::event::{Event, EventTime, Recurrence};

/// Parse ICS content into the events it declares.
///
/// `source_id` is stamped onto every event and used as the fallback UID
/// namespace for feeds that omit UID.
pub fn parse_calendar(content: &str, source_id: &str) -> InkCalResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| InkCalError::Parse(e.to_string()))?;

    let mut events = Vec::new();
    for (index, component) in calendar.components.iter().enumerate() {
        if component.name != "VEVENT" {
            continue;
        }
        match parse_event(component, source_id, index) {
            Some(event) => events.push(event),
            None => debug!(source_id, index, "skipping VEVENT without usable times"),
        }
    }
    Ok(events)
}

/// Parse one VEVENT component; `None` if it lacks a usable DTSTART/DTEND.
fn parse_event(vevent: &Component, source_id: &str, index: usize) -> Option<Event> {
    let id = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| format!("{source_id}#{index}"));

    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_else(|| "(No title)".to_string());

    let start = to_event_time(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);

    // Missing DTEND: all-day events span one day (DTEND is exclusive);
    // timed events without an end are dropped.
    let end = match vevent.find_prop("DTEND") {
        Some(prop) => to_event_time(DatePerhapsTime::try_from(prop).ok()?),
        None => match &start {
            EventTime::Date(d) => EventTime::Date(*d + Duration::days(1)),
            _ => return None,
        },
    };

    let rrule = vevent.find_prop("RRULE").map(|p| p.val.to_string());
    let exdates: Vec<EventTime> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .flat_map(parse_exdate_property)
        .collect();
    let recurrence = rrule.map(|rrule| Recurrence { rrule, exdates });

    Some(Event {
        id,
        summary,
        start,
        end,
        recurrence,
        source_id: source_id.to_string(),
    })
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving zone info.
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => EventTime::Utc(dt),
            icalendar::CalendarDateTime::Floating(naive) => EventTime::Floating(naive),
            icalendar::CalendarDateTime::WithTimezone { date_time, tzid } => EventTime::Zoned {
                datetime: date_time,
                tzid,
            },
        },
    }
}

/// Parse an EXDATE property into a list of EventTime values.
///
/// Handles:
/// - TZID parameter: `EXDATE;TZID=America/New_York:20240108T100000`
/// - VALUE=DATE: `EXDATE;VALUE=DATE:20240108`
/// - UTC: `EXDATE:20240108T100000Z`
/// - Floating: `EXDATE:20240108T100000`
/// - Comma-separated values: `EXDATE;TZID=...:20240108T100000,20240115T100000`
fn parse_exdate_property(prop: &Property) -> Vec<EventTime> {
    let tzid = prop
        .params
        .iter()
        .find(|p| p.key == "TZID")
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()));

    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"));

    let val_str = prop.val.as_ref();
    val_str
        .split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if is_date {
                chrono::NaiveDate::parse_from_str(s, "%Y%m%d")
                    .ok()
                    .map(EventTime::Date)
            } else if let Some(ref tz) = tzid {
                chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
                    .ok()
                    .map(|dt| EventTime::Zoned {
                        datetime: dt,
                        tzid: tz.clone(),
                    })
            } else if s.ends_with('Z') {
                let s = s.trim_end_matches('Z');
                chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
                    .ok()
                    .map(|dt| EventTime::Utc(dt.and_utc()))
            } else {
                chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
                    .ok()
                    .map(EventTime::Floating)
            }
        })
        .collect()
}

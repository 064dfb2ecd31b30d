//! "Next N events" selection for the upcoming list pane.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::event::Occurrence;

/// Select the next `count` occurrences as of `now`.
///
/// An occurrence is eligible if it starts in the future, or if it starts
/// on `now`'s calendar date (already-started events still count for the
/// rest of the day). Dates are evaluated in `now`'s zone.
///
/// The result is sorted ascending by start (stable, so ties keep their
/// source order) and contains the first `count` eligible occurrences in
/// that order, not the "best" `count`.
pub fn select_upcoming<'a>(
    occurrences: &[Occurrence<'a>],
    now: DateTime<Tz>,
    count: usize,
) -> Vec<Occurrence<'a>> {
    let zone = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let today = now.date_naive();

    let mut sorted: Vec<Occurrence<'a>> = occurrences.to_vec();
    sorted.sort_by_key(|o| o.start);

    let mut selected = Vec::new();
    for occ in sorted {
        let starts_today = occ.start.with_timezone(&zone).date_naive() == today;
        if occ.start > now_utc || starts_today {
            selected.push(occ);
        }
        if selected.len() >= count {
            break;
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventTime};
    use chrono::{Duration, TimeZone};
    use chrono_tz::America::Chicago;

    fn make_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            summary: id.to_string(),
            start: EventTime::Utc(Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap()),
            end: EventTime::Utc(Utc.with_ymd_and_hms(2025, 6, 10, 1, 0, 0).unwrap()),
            recurrence: None,
            source_id: "src".to_string(),
        }
    }

    fn occ<'a>(event: &'a Event, start: DateTime<Utc>, minutes: i64) -> Occurrence<'a> {
        Occurrence {
            event,
            start,
            end: start + Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_output_sorted_and_capped_at_count() {
        let ev = make_event("ev");
        // Deliberately unsorted input
        let occurrences = vec![
            occ(&ev, Utc.with_ymd_and_hms(2025, 6, 12, 9, 0, 0).unwrap(), 60),
            occ(&ev, Utc.with_ymd_and_hms(2025, 6, 11, 9, 0, 0).unwrap(), 60),
            occ(&ev, Utc.with_ymd_and_hms(2025, 6, 13, 9, 0, 0).unwrap(), 60),
        ];
        let now = Chicago.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

        let selected = select_upcoming(&occurrences, now, 2);
        assert_eq!(selected.len(), 2);
        assert!(selected[0].start <= selected[1].start);
        assert_eq!(
            selected[0].start,
            Utc.with_ymd_and_hms(2025, 6, 11, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_event_earlier_today_is_still_eligible() {
        let ev = make_event("ev");
        // 08:00 Chicago on June 10th, already over by `now` (noon)
        let occurrences = vec![occ(
            &ev,
            Chicago
                .with_ymd_and_hms(2025, 6, 10, 8, 0, 0)
                .unwrap()
                .with_timezone(&Utc),
            30,
        )];
        let now = Chicago.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

        let selected = select_upcoming(&occurrences, now, 5);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_yesterday_event_is_not_eligible() {
        let ev = make_event("ev");
        // 23:59 Chicago on June 9th
        let occurrences = vec![occ(
            &ev,
            Chicago
                .with_ymd_and_hms(2025, 6, 9, 23, 59, 0)
                .unwrap()
                .with_timezone(&Utc),
            30,
        )];
        let now = Chicago.with_ymd_and_hms(2025, 6, 10, 0, 1, 0).unwrap();

        assert!(select_upcoming(&occurrences, now, 5).is_empty());
    }

    #[test]
    fn test_tomorrow_just_past_midnight_is_eligible() {
        let ev = make_event("ev");
        // 00:05 Chicago on June 11th, strictly future relative to now
        let occurrences = vec![occ(
            &ev,
            Chicago
                .with_ymd_and_hms(2025, 6, 11, 0, 5, 0)
                .unwrap()
                .with_timezone(&Utc),
            30,
        )];
        let now = Chicago.with_ymd_and_hms(2025, 6, 10, 23, 55, 0).unwrap();

        assert_eq!(select_upcoming(&occurrences, now, 5).len(), 1);
    }

    #[test]
    fn test_date_boundary_uses_reference_zone_not_utc() {
        let ev = make_event("ev");
        // 21:00 Chicago June 10th == 02:00 UTC June 11th. In the reference
        // zone this is "today" even though the UTC date already rolled over.
        let start = Utc.with_ymd_and_hms(2025, 6, 11, 2, 0, 0).unwrap();
        let occurrences = vec![occ(&ev, start, 30)];
        let now = Chicago.with_ymd_and_hms(2025, 6, 10, 22, 0, 0).unwrap();

        assert_eq!(select_upcoming(&occurrences, now, 5).len(), 1);
    }

    #[test]
    fn test_first_count_in_order_not_best_count() {
        let ev = make_event("ev");
        let base = Utc.with_ymd_and_hms(2025, 6, 11, 9, 0, 0).unwrap();
        let occurrences: Vec<_> = (0..6)
            .map(|i| occ(&ev, base + Duration::hours(i), 30))
            .collect();
        let now = Chicago.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();

        let selected = select_upcoming(&occurrences, now, 3);
        let starts: Vec<_> = selected.iter().map(|o| o.start).collect();
        assert_eq!(
            starts,
            vec![base, base + Duration::hours(1), base + Duration::hours(2)]
        );
    }
}

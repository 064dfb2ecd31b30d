//! Bounded time window for expansion and layout.

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{InkCalError, InkCalResult};

/// The bounded interval (e.g. 5AM today to 3AM tomorrow) that expansion
/// and layout are computed against. `zone` is the zone naive event times
/// are interpreted in and hour gridlines are labelled in.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    pub zone: Tz,
}

impl TimeWindow {
    /// Build a window, rejecting `end <= start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, zone: Tz) -> InkCalResult<Self> {
        if end <= start {
            return Err(InkCalError::InvalidWindow { start, end });
        }
        Ok(TimeWindow { start, end, zone })
    }

    /// The render window for the day containing `now`: local `start_hour`
    /// o'clock for `hours` hours (which may wrap past midnight).
    pub fn for_day(now: DateTime<Tz>, start_hour: u32, hours: i64) -> InkCalResult<Self> {
        let zone = now.timezone();
        let naive = now
            .date_naive()
            .and_hms_opt(start_hour, 0, 0)
            .ok_or_else(|| InkCalError::Config(format!("invalid window start hour {start_hour}")))?;
        let start = zone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| {
                InkCalError::Config(format!("window start {naive} does not exist in {zone}"))
            })?
            .with_timezone(&Utc);

        TimeWindow::new(start, start + Duration::hours(hours), zone)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether the interval `[start, end)` overlaps this window.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        end > self.start && start < self.end
    }
}

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::{
    errors::Error, message::IncomingMessage, specification::MessageSpecification, Result,
};

pub const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Holds while the wall clock in `time_zone` lies within `[start, end]`.
///
/// A window whose start is after its end wraps past midnight
/// (`22:00`-`06:00` contains `23:30` and `02:00`). Evaluation always uses the
/// current time, not the message timestamp.
#[derive(Clone, Debug)]
pub struct TimeWindowSpecification {
    start: String,
    end: String,
    start_minute: u32,
    end_minute: u32,
    time_zone: Tz,
}

impl TimeWindowSpecification {
    pub fn new(start: &str, end: &str, time_zone: &str) -> Result<Self> {
        let start_minute = parse_hh_mm(start)
            .ok_or_else(|| Error::Validation(format!("invalid start time {start:?}, expected HH:MM")))?;
        let end_minute = parse_hh_mm(end)
            .ok_or_else(|| Error::Validation(format!("invalid end time {end:?}, expected HH:MM")))?;
        let time_zone: Tz = time_zone
            .parse()
            .map_err(|_| Error::Validation(format!("unknown time zone: {time_zone}")))?;

        Ok(Self {
            start: start.to_string(),
            end: end.to_string(),
            start_minute,
            end_minute,
            time_zone,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Whether a wall-clock time (already in the window's zone) is inside.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.contains_minute(time.hour() * 60 + time.minute())
    }

    pub fn contains_minute(&self, minute: u32) -> bool {
        let minute = minute % MINUTES_PER_DAY;
        if self.start_minute <= self.end_minute {
            minute >= self.start_minute && minute <= self.end_minute
        } else {
            minute >= self.start_minute || minute <= self.end_minute
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.time_zone);
        self.contains_minute(local.hour() * 60 + local.minute())
    }
}

impl MessageSpecification for TimeWindowSpecification {
    fn is_satisfied_by(&self, _message: &IncomingMessage) -> bool {
        self.is_active_at(Utc::now())
    }
}

/// `H:MM` or `HH:MM`, hours 0-23, minutes 00-59.
fn parse_hh_mm(s: &str) -> Option<u32> {
    let (h, m) = s.split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.chars().chain(m.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn validates_format_and_zone() {
        assert!(TimeWindowSpecification::new("24:00", "06:00", DEFAULT_TIME_ZONE).is_err());
        assert!(TimeWindowSpecification::new("9:5", "06:00", DEFAULT_TIME_ZONE).is_err());
        assert!(TimeWindowSpecification::new("0900", "06:00", DEFAULT_TIME_ZONE).is_err());
        assert!(TimeWindowSpecification::new("09:00", "17:60", DEFAULT_TIME_ZONE).is_err());
        assert!(TimeWindowSpecification::new("09:00", "17:00", "Mars/Olympus")
            .unwrap_err()
            .is_validation());
        assert!(TimeWindowSpecification::new("9:00", "17:00", "UTC").is_ok());
    }

    #[test]
    fn same_day_range_is_inclusive() {
        let w = TimeWindowSpecification::new("09:00", "17:00", "UTC").unwrap();
        assert!(w.contains(at(9, 0)));
        assert!(w.contains(at(12, 30)));
        assert!(w.contains(at(17, 0)));
        assert!(!w.contains(at(17, 1)));
        assert!(!w.contains(at(8, 59)));
    }

    #[test]
    fn overnight_range_wraps_midnight() {
        let w = TimeWindowSpecification::new("22:00", "06:00", DEFAULT_TIME_ZONE).unwrap();
        assert!(w.contains(at(23, 30)));
        assert!(w.contains(at(2, 0)));
        assert!(!w.contains(at(12, 0)));
    }

    #[test]
    fn evaluates_in_configured_zone() {
        // 14:30 UTC is 23:30 in Tokyo.
        let w = TimeWindowSpecification::new("22:00", "06:00", "Asia/Tokyo").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap();
        assert!(w.is_active_at(now));

        // 03:00 UTC is 12:00 in Tokyo.
        let noon = Utc.with_ymd_and_hms(2024, 5, 1, 3, 0, 0).unwrap();
        assert!(!w.is_active_at(noon));
    }

    #[test]
    fn full_day_window_always_matches() {
        let w = TimeWindowSpecification::new("00:00", "23:59", "UTC").unwrap();
        let msg = crate::test_support::text_message("anything");
        assert!(w.is_satisfied_by(&msg));
    }
}

//! Wall clock
//!
//! Source of the time and date shown in the status bar and notification
//! shade. The system clock follows the host's local timezone unless a fixed
//! UTC offset is configured.

use chrono::{DateTime, FixedOffset, Local, Utc};

/// A moment on the wall clock, with the offset it is displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime(DateTime<FixedOffset>);

impl WallTime {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }

    /// Seconds since the Unix epoch, shown at `offset`. `None` if out of range.
    pub fn from_unix(secs: i64, offset: FixedOffset) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|utc| Self(utc.with_timezone(&offset)))
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Status bar time, e.g. `09:05`
    pub fn time_text(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// Shade date, e.g. `Mon, Oct 20`
    pub fn date_text(&self) -> String {
        self.0.format("%a, %b %-d").to_string()
    }
}

/// Time source
pub trait Clock {
    fn now(&self) -> WallTime;
}

/// Host clock in local time, or at a fixed offset when one is set
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Fixed offset east of UTC. `None` unless strictly within one day.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(minutes.checked_mul(60)?)?;
        Some(Self {
            offset: Some(offset),
        })
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> WallTime {
        match self.offset {
            Some(offset) => WallTime(Utc::now().with_timezone(&offset)),
            None => WallTime(Local::now().fixed_offset()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_known_instant() {
        let t = WallTime::from_unix(1_760_951_100, utc()).unwrap();
        let at = t.datetime();
        assert_eq!((at.year(), at.month(), at.day()), (2025, 10, 20));
        assert_eq!(t.time_text(), "09:05");
        assert_eq!(t.date_text(), "Mon, Oct 20");
    }

    #[test]
    fn test_leap_day() {
        let t = WallTime::from_unix(951_868_740, utc()).unwrap();
        assert_eq!(t.date_text(), "Tue, Feb 29");
    }

    #[test]
    fn test_offset_crosses_midnight() {
        // 23:59 UTC + 2h
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let t = WallTime::from_unix(951_868_740, plus_two).unwrap();
        assert_eq!(t.time_text(), "01:59");
        assert_eq!(t.date_text(), "Wed, Mar 1");
    }

    #[test]
    fn test_system_clock_follows_host_local_time() {
        let clock = SystemClock::local();
        let before = Local::now();
        let shown = clock.now();
        let after = Local::now();

        assert_eq!(shown.datetime().offset(), before.offset());
        // The minute may roll over between the two reads
        let candidates = [
            before.format("%H:%M").to_string(),
            after.format("%H:%M").to_string(),
        ];
        assert!(
            candidates.contains(&shown.time_text()),
            "status bar shows {}, host shows {:?}",
            shown.time_text(),
            candidates
        );
    }

    #[test]
    fn test_system_clock_fixed_offset() {
        let clock = SystemClock::with_offset_minutes(-300).unwrap();
        assert_eq!(clock.offset().map(|o| o.local_minus_utc()), Some(-18_000));

        let now = clock.now().datetime();
        let expected = Utc::now().with_timezone(&FixedOffset::west_opt(18_000).unwrap());
        let diff = (expected.num_seconds_from_midnight() as i64
            - now.num_seconds_from_midnight() as i64)
            .rem_euclid(86_400);
        assert!(diff <= 1 || diff >= 86_399);
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(SystemClock::with_offset_minutes(24 * 60).is_none());
        assert!(SystemClock::with_offset_minutes(i32::MAX).is_none());
        assert!(SystemClock::with_offset_minutes(-(23 * 60 + 59)).is_some());
    }
}

//! Distance between an instant and "now", in human units.

use crate::domain::date::ResolvedInstant;

/// Seconds per minute.
pub const MINUTE: u64 = 60;
/// Seconds per hour.
pub const HOUR: u64 = MINUTE * 60;
/// Seconds per day.
pub const DAY: u64 = HOUR * 24;
/// Seconds per week.
pub const WEEK: u64 = DAY * 7;
/// Seconds per (30 day) month.
pub const MONTH: u64 = DAY * 30;
/// Seconds per (365 day) year.
pub const YEAR: u64 = DAY * 365;

/// Whether the instant lies before or after "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The instant is in the past
    Past,
    /// The instant is now or in the future
    Future,
}

/// Unit used to express a relative time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Singular English name.
    pub fn name(&self) -> &'static str {
        match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        }
    }
}

/// Unsigned distance between an instant and a reference "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    millis: u64,
    direction: Direction,
}

impl Elapsed {
    /// Measure from `now` to `then`.
    pub fn between(then: ResolvedInstant, now: ResolvedInstant) -> Self {
        let direction = if then < now {
            Direction::Past
        } else {
            Direction::Future
        };
        Self {
            millis: then.distance_to(now),
            direction,
        }
    }

    /// Distance in milliseconds.
    pub fn millis(&self) -> u64 {
        self.millis
    }

    /// Distance in whole seconds, rounded to nearest.
    pub fn seconds(&self) -> u64 {
        self.millis.saturating_add(500) / 1000
    }

    /// Past or future.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Express the distance in the largest unit that fits.
    ///
    /// ```
    /// use live_timeago::{Elapsed, ResolvedInstant, TimeUnit};
    ///
    /// let now = ResolvedInstant::from_millis(10_000_000);
    /// let then = ResolvedInstant::from_millis(10_000_000 - 150_000);
    /// let relative = Elapsed::between(then, now).relative();
    /// assert_eq!((relative.value, relative.unit), (3, TimeUnit::Minute));
    /// ```
    pub fn relative(&self) -> RelativeTime {
        let seconds = self.seconds();
        let (value, unit) = if seconds < MINUTE {
            (seconds, TimeUnit::Second)
        } else if seconds < HOUR {
            (round_div(seconds, MINUTE), TimeUnit::Minute)
        } else if seconds < DAY {
            (round_div(seconds, HOUR), TimeUnit::Hour)
        } else if seconds < WEEK {
            (round_div(seconds, DAY), TimeUnit::Day)
        } else if seconds < MONTH {
            (round_div(seconds, WEEK), TimeUnit::Week)
        } else if seconds < YEAR {
            (round_div(seconds, MONTH), TimeUnit::Month)
        } else {
            (round_div(seconds, YEAR), TimeUnit::Year)
        };
        RelativeTime {
            value,
            unit,
            direction: self.direction,
        }
    }
}

/// A rounded relative time such as "3 minutes, past".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeTime {
    pub value: u64,
    pub unit: TimeUnit,
    pub direction: Direction,
}

/// Integer division rounding halves up.
pub(crate) fn round_div(value: u64, unit: u64) -> u64 {
    (value + unit / 2) / unit
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn relative(offset_secs: i64) -> RelativeTime {
        let now = ResolvedInstant::from_millis(NOW);
        let then = ResolvedInstant::from_millis(NOW - offset_secs * 1000);
        Elapsed::between(then, now).relative()
    }

    #[test]
    fn test_buckets() {
        assert_eq!(relative(5).unit, TimeUnit::Second);
        assert_eq!(relative(5).value, 5);
        assert_eq!(relative(90).value, 2);
        assert_eq!(relative(90).unit, TimeUnit::Minute);
        assert_eq!(relative(2 * HOUR as i64).unit, TimeUnit::Hour);
        assert_eq!(relative(3 * DAY as i64).unit, TimeUnit::Day);
        assert_eq!(relative(2 * WEEK as i64).unit, TimeUnit::Week);
        assert_eq!(relative(2 * MONTH as i64).unit, TimeUnit::Month);
        assert_eq!(relative(3 * YEAR as i64).value, 3);
        assert_eq!(relative(3 * YEAR as i64).unit, TimeUnit::Year);
    }

    #[test]
    fn test_direction() {
        assert_eq!(relative(10).direction, Direction::Past);
        assert_eq!(relative(-10).direction, Direction::Future);
        assert_eq!(relative(0).direction, Direction::Future);
    }

    #[test]
    fn test_seconds_round_to_nearest() {
        let now = ResolvedInstant::from_millis(NOW);
        let elapsed = Elapsed::between(ResolvedInstant::from_millis(NOW - 1_499), now);
        assert_eq!(elapsed.seconds(), 1);
        let elapsed = Elapsed::between(ResolvedInstant::from_millis(NOW - 1_500), now);
        assert_eq!(elapsed.seconds(), 2);
    }
}

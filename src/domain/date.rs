//! Date inputs and their normalization to absolute instants.
//!
//! A [`DateInput`] is whatever the caller hands to a binding: text, an epoch
//! number, or an absolute instant. It is resolved exactly once, on assignment,
//! into a [`ResolvedInstant`] or a [`DateParseError`].

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;
use std::time::SystemTime;

/// Largest magnitude (in milliseconds) an instant may have: 100,000,000 days.
pub const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// An absolute instant in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolvedInstant(i64);

impl ResolvedInstant {
    /// Create an instant from milliseconds since the Unix epoch.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the Unix epoch.
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Absolute distance to another instant, in milliseconds.
    pub fn distance_to(self, other: ResolvedInstant) -> u64 {
        self.0.abs_diff(other.0)
    }

    /// Convert to a chrono UTC timestamp, if representable.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for ResolvedInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Why a [`DateInput`] could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    /// Text input was empty or whitespace only
    #[error("date text is empty")]
    Empty,
    /// Numeric input was NaN or infinite
    #[error("epoch value is not a finite number")]
    NonFinite,
    /// Value lies outside the representable instant range
    #[error("date is outside the representable range")]
    OutOfRange,
    /// Text did not match any known date shape
    #[error("unrecognized date text: {0:?}")]
    Unrecognized(String),
}

/// A date-like value supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    /// A textual timestamp such as `2024-05-01T12:00:00Z`
    Text(String),
    /// Milliseconds since the Unix epoch
    Epoch(f64),
    /// An already absolute instant
    Instant(DateTime<Utc>),
}

impl DateInput {
    /// Normalize to an absolute instant.
    ///
    /// # Example
    /// ```
    /// use live_timeago::DateInput;
    ///
    /// let instant = DateInput::from("1970-01-01T00:00:01Z").resolve().unwrap();
    /// assert_eq!(instant.as_millis(), 1_000);
    ///
    /// assert!(DateInput::from("soon").resolve().is_err());
    /// ```
    pub fn resolve(&self) -> Result<ResolvedInstant, DateParseError> {
        match self {
            DateInput::Epoch(millis) => resolve_epoch(*millis),
            DateInput::Instant(dt) => bounded(dt.timestamp_millis()),
            DateInput::Text(text) => resolve_text(text),
        }
    }
}

fn resolve_epoch(millis: f64) -> Result<ResolvedInstant, DateParseError> {
    if !millis.is_finite() {
        return Err(DateParseError::NonFinite);
    }
    if millis.abs() > MAX_EPOCH_MILLIS {
        return Err(DateParseError::OutOfRange);
    }
    Ok(ResolvedInstant(millis.trunc() as i64))
}

fn bounded(millis: i64) -> Result<ResolvedInstant, DateParseError> {
    if millis.unsigned_abs() as f64 > MAX_EPOCH_MILLIS {
        return Err(DateParseError::OutOfRange);
    }
    Ok(ResolvedInstant(millis))
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn resolve_text(text: &str) -> Result<ResolvedInstant, DateParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return bounded(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return bounded(dt.timestamp_millis());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return bounded(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return bounded(midnight.and_utc().timestamp_millis());
        }
    }

    resolve_digit_runs(text).ok_or_else(|| DateParseError::Unrecognized(text.to_string()))
}

/// Read the digit runs of `text` as UTC calendar fields.
///
/// At least three runs are required (year, month, day). Up to seven are used
/// (hour, minute, second, millisecond), extra runs are ignored. Fields overflow
/// into the next larger unit, so month 13 is January of the following year.
fn resolve_digit_runs(text: &str) -> Option<ResolvedInstant> {
    let parts: Vec<i64> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<i64>())
        .collect::<Result<_, _>>()
        .ok()?;

    if parts.len() <= 2 {
        return None;
    }

    let field = |i: usize| parts.get(i).copied().unwrap_or(0);
    let mut year = parts[0];
    if (0..=99).contains(&year) {
        year += 1900;
    }

    let months = year.checked_mul(12)?.checked_add(parts[1] - 1)?;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;

    let offset = Duration::try_days(parts[2] - 1)?
        .checked_add(&Duration::try_hours(field(3))?)?
        .checked_add(&Duration::try_minutes(field(4))?)?
        .checked_add(&Duration::try_seconds(field(5))?)?
        .checked_add(&Duration::try_milliseconds(field(6))?)?;

    let naive = first.checked_add_signed(offset)?;
    bounded(Utc.from_utc_datetime(&naive).timestamp_millis()).ok()
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<i64> for DateInput {
    fn from(millis: i64) -> Self {
        DateInput::Epoch(millis as f64)
    }
}

impl From<u64> for DateInput {
    fn from(millis: u64) -> Self {
        DateInput::Epoch(millis as f64)
    }
}

impl From<f64> for DateInput {
    fn from(millis: f64) -> Self {
        DateInput::Epoch(millis)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(dt: DateTime<Tz>) -> Self {
        DateInput::Instant(dt.with_timezone(&Utc))
    }
}

impl From<SystemTime> for DateInput {
    fn from(time: SystemTime) -> Self {
        DateInput::Instant(DateTime::<Utc>::from(time))
    }
}

impl From<ResolvedInstant> for DateInput {
    fn from(instant: ResolvedInstant) -> Self {
        DateInput::Epoch(instant.as_millis() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(input: impl Into<DateInput>) -> i64 {
        input.into().resolve().unwrap().as_millis()
    }

    #[test]
    fn test_epoch_numbers() {
        assert_eq!(millis(1_500_000_000_000_i64), 1_500_000_000_000);
        assert_eq!(millis(0_i64), 0);
        assert_eq!(millis(-1_000_i64), -1_000);
        assert_eq!(millis(1_234.9_f64), 1_234);
        assert_eq!(millis(-1_234.9_f64), -1_234);
    }

    #[test]
    fn test_epoch_rejects_non_finite_and_out_of_range() {
        assert_eq!(
            DateInput::Epoch(f64::NAN).resolve(),
            Err(DateParseError::NonFinite)
        );
        assert_eq!(
            DateInput::Epoch(f64::INFINITY).resolve(),
            Err(DateParseError::NonFinite)
        );
        assert_eq!(
            DateInput::Epoch(9e15).resolve(),
            Err(DateParseError::OutOfRange)
        );
    }

    #[test]
    fn test_rfc3339_and_rfc2822() {
        assert_eq!(millis("2020-01-01T00:00:00Z"), 1_577_836_800_000);
        assert_eq!(millis("2020-01-01T01:00:00+01:00"), 1_577_836_800_000);
        assert_eq!(millis("Wed, 01 Jan 2020 00:00:00 +0000"), 1_577_836_800_000);
    }

    #[test]
    fn test_naive_text_is_utc() {
        assert_eq!(millis("2020-01-01 00:00:00"), 1_577_836_800_000);
        assert_eq!(millis("2020-01-01T00:00:00.250"), 1_577_836_800_250);
        assert_eq!(millis("2020-01-01T00:00"), 1_577_836_800_000);
        assert_eq!(millis("2020-01-01"), 1_577_836_800_000);
    }

    #[test]
    fn test_digit_run_fallback() {
        assert_eq!(millis("2020/01/01 00h00"), 1_577_836_800_000);
        assert_eq!(millis("2020.1.1"), 1_577_836_800_000);
        // month 13 rolls over into the next year
        assert_eq!(millis("2019-13-01 junk"), 1_577_836_800_000);
        // two-digit years land in the twentieth century
        assert_eq!(millis("70 1 1"), 0);
    }

    #[test]
    fn test_unrecognized_text() {
        assert_eq!(DateInput::from("   ").resolve(), Err(DateParseError::Empty));
        assert!(matches!(
            DateInput::from("yesterday").resolve(),
            Err(DateParseError::Unrecognized(_))
        ));
        // a bare number in text form has too few digit runs
        assert!(DateInput::from("1500000000000").resolve().is_err());
        assert!(DateInput::from("12/25").resolve().is_err());
    }

    #[test]
    fn test_absolute_instants() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(millis(dt), 1_577_836_800_000);

        let system = SystemTime::UNIX_EPOCH + std::time::Duration::from_millis(42);
        assert_eq!(millis(system), 42);
    }

    #[test]
    fn test_every_input_kind_shares_the_range_bound() {
        assert_eq!(
            bounded(8_640_000_000_000_000),
            Ok(ResolvedInstant(8_640_000_000_000_000))
        );
        assert_eq!(
            bounded(-8_640_000_000_000_001),
            Err(DateParseError::OutOfRange)
        );
        assert_eq!(bounded(i64::MIN), Err(DateParseError::OutOfRange));

        let latest = DateTime::<Utc>::MAX_UTC;
        assert_eq!(
            DateInput::Instant(latest).resolve(),
            bounded(latest.timestamp_millis())
        );
        assert_eq!(
            DateInput::Epoch(latest.timestamp_millis() as f64 * 1.1).resolve(),
            Err(DateParseError::OutOfRange)
        );
    }

    #[test]
    fn test_instant_display_and_distance() {
        let a = ResolvedInstant::from_millis(0);
        let b = ResolvedInstant::from_millis(-2_500);
        assert_eq!(a.distance_to(b), 2_500);
        assert_eq!(b.distance_to(a), 2_500);
        assert_eq!(a.to_string(), "1970-01-01T00:00:00+00:00");
    }
}

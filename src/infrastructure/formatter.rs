//! Formatter adapters.
//!
//! `DefaultFormatter` writes plain English ("3 minutes ago"). `IntlFormatter`
//! reads its phrases from a `SharedLocaleStore`, so a binding subscribed to the
//! same store re-renders in the new language as soon as the table changes.

use crate::application::ports::{Formatter, TimeSource};
use crate::domain::date::ResolvedInstant;
use crate::domain::relative::{Direction, Elapsed};
use crate::domain::strings::LocaleStrings;
use crate::infrastructure::clock::SystemTimeSource;
use crate::infrastructure::locale::SharedLocaleStore;
use std::sync::Arc;

/// Plain English labels: `"<n> <unit>[s] ago"` or `"... from now"`.
///
/// ```
/// use live_timeago::{DefaultFormatter, Formatter, ResolvedInstant};
///
/// let formatter = DefaultFormatter::new();
/// let label = formatter.format(ResolvedInstant::from_millis(0), true);
/// assert!(label.ends_with("years ago"));
/// ```
#[derive(Debug, Clone)]
pub struct DefaultFormatter {
    time: Arc<dyn TimeSource>,
}

impl DefaultFormatter {
    /// Formatter measuring against the system clock.
    pub fn new() -> Self {
        Self::with_time_source(SystemTimeSource::new())
    }

    /// Formatter measuring against `time`.
    pub fn with_time_source<T: TimeSource + 'static>(time: T) -> Self {
        Self {
            time: Arc::new(time),
        }
    }
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, instant: ResolvedInstant, suffix: bool) -> String {
        let relative = Elapsed::between(instant, self.time.now()).relative();
        let plural = if relative.value == 1 { "" } else { "s" };
        let mut label = format!("{} {}{}", relative.value, relative.unit.name(), plural);
        if suffix {
            label.push_str(match relative.direction {
                Direction::Past => " ago",
                Direction::Future => " from now",
            });
        }
        label
    }
}

/// Labels built from the shared locale table.
#[derive(Debug, Clone)]
pub struct IntlFormatter {
    store: SharedLocaleStore,
    time: Arc<dyn TimeSource>,
}

impl IntlFormatter {
    /// Formatter reading phrases from `store`, measuring against the system clock.
    pub fn new(store: SharedLocaleStore) -> Self {
        Self::with_time_source(store, SystemTimeSource::new())
    }

    /// Formatter reading phrases from `store`, measuring against `time`.
    pub fn with_time_source<T: TimeSource + 'static>(store: SharedLocaleStore, time: T) -> Self {
        Self {
            store,
            time: Arc::new(time),
        }
    }
}

impl Formatter for IntlFormatter {
    fn format(&self, instant: ResolvedInstant, suffix: bool) -> String {
        let elapsed = Elapsed::between(instant, self.time.now());
        self.store
            .with_strings(|strings| phrase(strings, &elapsed, suffix))
    }
}

fn phrase(strings: &LocaleStrings, elapsed: &Elapsed, suffix: bool) -> String {
    let seconds = elapsed.millis() as f64 / 1000.0;
    let minutes = seconds / 60.0;
    let hours = minutes / 60.0;
    let days = hours / 24.0;
    let years = days / 365.0;

    let (template, value) = if seconds < 45.0 {
        (&strings.seconds, seconds.round())
    } else if seconds < 90.0 {
        (&strings.minute, 1.0)
    } else if minutes < 45.0 {
        (&strings.minutes, minutes.round())
    } else if minutes < 90.0 {
        (&strings.hour, 1.0)
    } else if hours < 24.0 {
        (&strings.hours, hours.round())
    } else if hours < 42.0 {
        (&strings.day, 1.0)
    } else if days < 30.0 {
        (&strings.days, days.round())
    } else if days < 45.0 {
        (&strings.month, 1.0)
    } else if days < 365.0 {
        (&strings.months, (days / 30.0).round())
    } else if years < 1.5 {
        (&strings.year, 1.0)
    } else {
        (&strings.years, years.round())
    };
    let words = strings.substitute(template, value as u64);

    let (prefix, trailer) = match (suffix, elapsed.direction()) {
        (false, _) => (None, None),
        (true, Direction::Past) => (strings.prefix_ago.as_deref(), strings.suffix_ago.as_deref()),
        (true, Direction::Future) => (
            strings.prefix_from_now.as_deref(),
            strings.suffix_from_now.as_deref(),
        ),
    };

    [prefix, Some(words.as_str()), trailer]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(&strings.word_separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockTimeSource;

    const NOW: i64 = 1_700_000_000_000;

    fn ago(secs: i64) -> ResolvedInstant {
        ResolvedInstant::from_millis(NOW - secs * 1000)
    }

    fn intl(store: &SharedLocaleStore) -> IntlFormatter {
        IntlFormatter::with_time_source(
            store.clone(),
            MockTimeSource::new(ResolvedInstant::from_millis(NOW)),
        )
    }

    #[test]
    fn test_default_formatter() {
        let time = MockTimeSource::new(ResolvedInstant::from_millis(NOW));
        let formatter = DefaultFormatter::with_time_source(time);

        assert_eq!(formatter.format(ago(120), true), "2 minutes ago");
        assert_eq!(formatter.format(ago(120), false), "2 minutes");
        assert_eq!(formatter.format(ago(3_600), true), "1 hour ago");
        assert_eq!(formatter.format(ago(-86_400 * 3), true), "3 days from now");
    }

    #[test]
    fn test_intl_english_buckets() {
        let store = SharedLocaleStore::default();
        let formatter = intl(&store);

        assert_eq!(formatter.format(ago(10), true), "less than a minute ago");
        assert_eq!(formatter.format(ago(60), true), "about a minute ago");
        assert_eq!(formatter.format(ago(120), true), "2 minutes ago");
        assert_eq!(formatter.format(ago(3_600), true), "about an hour ago");
        assert_eq!(formatter.format(ago(5 * 3_600), true), "about 5 hours ago");
        assert_eq!(formatter.format(ago(30 * 3_600), true), "a day ago");
        assert_eq!(formatter.format(ago(10 * 86_400), true), "10 days ago");
        assert_eq!(
            formatter.format(ago(40 * 86_400), true),
            "about a month ago"
        );
        assert_eq!(formatter.format(ago(90 * 86_400), true), "3 months ago");
        assert_eq!(
            formatter.format(ago(400 * 86_400), true),
            "about a year ago"
        );
        assert_eq!(formatter.format(ago(3 * 365 * 86_400), true), "3 years ago");
    }

    #[test]
    fn test_intl_future_and_no_suffix() {
        let store = SharedLocaleStore::default();
        let formatter = intl(&store);

        assert_eq!(formatter.format(ago(-120), true), "2 minutes from now");
        assert_eq!(formatter.format(ago(120), false), "2 minutes");
    }

    #[test]
    fn test_intl_follows_store_changes() {
        let store = SharedLocaleStore::default();
        let formatter = intl(&store);

        store
            .load_json(
                r#"{
                    "prefixAgo": "il y a",
                    "suffixAgo": null,
                    "prefixFromNow": "dans",
                    "suffixFromNow": null,
                    "minutes": "%d minutes"
                }"#,
            )
            .unwrap();

        assert_eq!(formatter.format(ago(120), true), "il y a 2 minutes");
        assert_eq!(formatter.format(ago(-120), true), "dans 2 minutes");
        assert_eq!(formatter.format(ago(120), false), "2 minutes");
    }

    #[test]
    fn test_intl_numerals_and_separator() {
        let store = SharedLocaleStore::default();
        store.update(|table| {
            table.word_separator = "_".to_string();
            table.numbers = vec!["zero".into(), "one".into(), "two".into()];
        });
        let formatter = intl(&store);

        assert_eq!(formatter.format(ago(120), true), "two minutes_ago");
    }
}

//! Integration tests wiring a binding to the shipped formatter, locale store and text node.

use live_timeago::{
    Binding, Clock, DefaultFormatter, IntlFormatter, LocaleStrings, ResolvedInstant,
    SharedLocaleStore, Subscription, TextNode, Tick, TickSink, TimeSource,
};
use std::sync::{Arc, Mutex};

const NOW: i64 = 1_700_000_000_000;

#[derive(Debug, Clone, Copy)]
struct FixedTime(i64);

impl TimeSource for FixedTime {
    fn now(&self) -> ResolvedInstant {
        ResolvedInstant::from_millis(self.0)
    }
}

/// Delivers tick 0 on registration and keeps the sink so the test can tick by hand.
#[derive(Clone, Default)]
struct HandClock {
    sinks: Arc<Mutex<Vec<(ResolvedInstant, TickSink)>>>,
}

impl HandClock {
    fn tick(&self, index: u64) {
        let sinks = self.sinks.lock().unwrap().clone();
        for (instant, sink) in sinks {
            sink(Tick { index, instant });
        }
    }
}

impl Clock for HandClock {
    fn register(&self, instant: ResolvedInstant, sink: TickSink) -> Subscription {
        sink(Tick { index: 0, instant });
        self.sinks
            .lock()
            .unwrap()
            .push((instant, Arc::clone(&sink)));
        let sinks = Arc::clone(&self.sinks);
        Subscription::new(move || {
            sinks
                .lock()
                .unwrap()
                .retain(|(_, registered)| !Arc::ptr_eq(registered, &sink));
        })
    }
}

fn ago(secs: i64) -> i64 {
    NOW - secs * 1000
}

#[test]
fn test_language_switch_updates_displayed_label() {
    let locale = SharedLocaleStore::default();
    let node = TextNode::with_text("…");
    let formatter = IntlFormatter::with_time_source(locale.clone(), FixedTime(NOW));
    let mut binding = Binding::builder(HandClock::default(), formatter, node.clone())
        .with_locale_store(locale.clone())
        .build();

    binding.set_date(ago(3 * 86_400));
    assert_eq!(node.text(), "3 days ago");

    locale
        .load_json(
            r#"{
                "prefixAgo": "hace",
                "suffixAgo": null,
                "days": "%d días"
            }"#,
        )
        .unwrap();
    assert_eq!(node.text(), "hace 3 días");

    binding.set_suffix(false);
    assert_eq!(node.text(), "3 días");
}

#[test]
fn test_invalid_locale_document_keeps_label() {
    let locale = SharedLocaleStore::default();
    let node = TextNode::new();
    let formatter = IntlFormatter::with_time_source(locale.clone(), FixedTime(NOW));
    let mut binding = Binding::builder(HandClock::default(), formatter, node.clone())
        .with_locale_store(locale.clone())
        .build();
    binding.set_date(ago(120));

    assert!(locale.load_json(r#"{"minutes": 5}"#).is_err());

    assert_eq!(node.text(), "2 minutes ago");
    assert_eq!(binding.metrics().renders(), 1);
}

#[test]
fn test_future_dates_and_ticks() {
    let clock = HandClock::default();
    let node = TextNode::new();
    let formatter = DefaultFormatter::with_time_source(FixedTime(NOW));
    let mut binding = Binding::builder(clock.clone(), formatter, node.clone()).build();

    binding.set_date(ago(-2 * 3_600));
    assert_eq!(node.text(), "2 hours from now");

    clock.tick(1);
    assert_eq!(binding.metrics().renders(), 2);
}

#[test]
fn test_teardown_unsubscribes_from_shared_store() {
    let locale = SharedLocaleStore::new(LocaleStrings::english());
    let clock = HandClock::default();
    let node = TextNode::new();

    let bindings: Vec<Binding> = (0..3)
        .map(|_| {
            let formatter = IntlFormatter::with_time_source(locale.clone(), FixedTime(NOW));
            let mut binding = Binding::builder(clock.clone(), formatter, node.clone())
                .with_locale_store(locale.clone())
                .build();
            binding.set_date(ago(30));
            binding
        })
        .collect();
    assert_eq!(locale.subscriber_count(), 3);
    assert_eq!(clock.sinks.lock().unwrap().len(), 3);

    drop(bindings);

    assert_eq!(locale.subscriber_count(), 0);
    assert!(clock.sinks.lock().unwrap().is_empty());
}

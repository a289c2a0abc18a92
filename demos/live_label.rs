//! A label that keeps itself current, switches language, and pauses.
//!
//! Run with: `cargo run --example live_label`
//! Set `RUST_LOG=live_timeago=trace` to watch every tick and render.

use live_timeago::{AdaptiveClock, Binding, IntlFormatter, SharedLocaleStore, TextNode};
use std::time::{Duration, SystemTime};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DUTCH: &str = r#"{
    "prefixAgo": null,
    "suffixAgo": "geleden",
    "seconds": "minder dan een minuut",
    "minute": "ongeveer een minuut",
    "minutes": "%d minuten",
    "hour": "ongeveer een uur",
    "hours": "ongeveer %d uur"
}"#;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("live_timeago=debug")),
        )
        .init();

    println!("=== Live Label Example ===\n");

    let locale = SharedLocaleStore::default();
    let node = TextNode::with_text("…");

    let mut binding = Binding::builder(
        AdaptiveClock::new(),
        IntlFormatter::new(locale.clone()),
        node.clone(),
    )
    .with_locale_store(locale.clone())
    .build();

    println!("Before any date: {:?}", node.text());

    binding.set_date(SystemTime::now() - Duration::from_secs(40));
    println!("Date set 40 seconds in the past:");
    for _ in 0..8 {
        println!("  {}", node.text());
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    println!("\nSwitching to Dutch:");
    if let Err(err) = locale.load_json(DUTCH) {
        eprintln!("  failed to load locale: {err}");
    }
    println!("  {}", node.text());

    println!("\nPausing live updates for 3 seconds:");
    binding.set_live(false);
    tokio::time::sleep(Duration::from_secs(3)).await;
    println!("  still showing {}", node.text());

    binding.set_live(true);
    println!("  resumed: {}", node.text());

    println!("\nDropping the suffix:");
    binding.set_suffix(false);
    println!("  {}", node.text());

    println!("\nAn unparsable date is ignored:");
    let outcome = binding.set_date("not a date");
    println!("  {outcome:?}, label stays {:?}", node.text());

    binding.teardown();

    let snapshot = binding.metrics().snapshot();
    println!("\n=== Binding Metrics ===");
    println!("Renders: {}", snapshot.renders);
    println!("Ticks admitted: {}", snapshot.ticks_admitted);
    println!("Ticks dropped: {}", snapshot.ticks_dropped);
    println!("Locale changes: {}", snapshot.locale_changes);
    println!("Invalid dates: {}", snapshot.invalid_dates);
}

//! A binding driven by the tokio-backed adaptive clock.

#![cfg(feature = "async")]

use live_timeago::{
    AdaptiveClock, Binding, CadenceConfig, CadenceStep, DefaultFormatter, Formatter, RenderTarget,
    ResolvedInstant, TextNode, TimeSource,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, SystemTime};

const NOW: i64 = 1_700_000_000_000;

#[derive(Debug, Clone, Copy)]
struct FixedTime;

impl TimeSource for FixedTime {
    fn now(&self) -> ResolvedInstant {
        ResolvedInstant::from_millis(NOW)
    }
}

fn binding(clock: AdaptiveClock, node: &TextNode) -> Binding {
    Binding::builder(
        clock.with_time_source(FixedTime),
        DefaultFormatter::with_time_source(FixedTime),
        node.clone(),
    )
    .build()
}

#[tokio::test(start_paused = true)]
async fn test_recent_date_ticks_every_second() {
    let node = TextNode::new();
    let mut binding = binding(AdaptiveClock::new(), &node);

    binding.set_date(NOW - 10_000);
    assert_eq!(node.text(), "10 seconds ago");
    assert_eq!(binding.metrics().renders(), 1);

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    assert_eq!(binding.metrics().renders(), 4);

    binding.teardown();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(binding.metrics().renders(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_paused_binding_drops_adaptive_ticks() {
    let node = TextNode::new();
    let mut binding = binding(AdaptiveClock::new(), &node);
    binding.set_live(false);

    binding.set_date(NOW - 5_000);
    tokio::time::sleep(Duration::from_millis(2_500)).await;

    let snapshot = binding.metrics().snapshot();
    assert_eq!(snapshot.renders, 1);
    assert_eq!(snapshot.ticks_dropped, 2);

    binding.set_live(true);
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(binding.metrics().renders(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_date_change_replaces_running_feed() {
    let cadence = CadenceConfig::new(vec![CadenceStep::new(
        Duration::from_secs(3_600),
        Duration::from_millis(500),
    )])
    .unwrap();
    let node = TextNode::new();
    let mut binding = binding(AdaptiveClock::new().with_cadence(cadence), &node);

    binding.set_date(NOW - 60_000);
    tokio::time::sleep(Duration::from_millis(1_250)).await;
    assert_eq!(binding.metrics().renders(), 3);

    binding.set_date(NOW - 120_000);
    assert_eq!(node.text(), "2 minutes ago");
    tokio::time::sleep(Duration::from_millis(1_250)).await;

    // one feed at a time: 1 initial + 2 ticks from the new feed
    assert_eq!(binding.metrics().renders(), 6);
}

/// Blocks inside its second call (the first clock tick) until the test lets it go.
struct BlockingFormatter {
    calls: AtomicUsize,
    entered: Mutex<mpsc::Sender<()>>,
    resume: Mutex<mpsc::Receiver<()>>,
}

impl Formatter for BlockingFormatter {
    fn format(&self, instant: ResolvedInstant, _suffix: bool) -> String {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
            self.entered.lock().unwrap().send(()).unwrap();
            self.resume.lock().unwrap().recv().unwrap();
        }
        instant.as_millis().to_string()
    }
}

struct CountingTarget(Arc<AtomicUsize>);

impl RenderTarget for CountingTarget {
    fn set_text(&mut self, _text: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_teardown_waits_for_render_in_flight() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (resume_tx, resume_rx) = mpsc::channel();
    let writes = Arc::new(AtomicUsize::new(0));
    let cadence = CadenceConfig::new(vec![CadenceStep::new(
        Duration::from_secs(3_600),
        Duration::from_millis(10),
    )])
    .unwrap();

    let mut binding = Binding::builder(
        AdaptiveClock::new().with_cadence(cadence),
        BlockingFormatter {
            calls: AtomicUsize::new(0),
            entered: Mutex::new(entered_tx),
            resume: Mutex::new(resume_rx),
        },
        CountingTarget(Arc::clone(&writes)),
    )
    .build();

    binding.set_date(SystemTime::now());
    assert_eq!(writes.load(Ordering::SeqCst), 1);

    // tick 1 is now formatting on a worker thread
    entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let resumer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        resume_tx.send(()).unwrap();
    });

    binding.teardown();
    let at_teardown = writes.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(100)).await;
    resumer.join().unwrap();

    assert_eq!(at_teardown, 2);
    assert_eq!(writes.load(Ordering::SeqCst), at_teardown);
}

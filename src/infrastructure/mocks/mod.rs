//! Mock implementations for testing.
//!
//! This module provides test doubles for the binding's collaborators,
//! enabling deterministic tests of the render orchestration.

pub mod clock;
pub mod formatter;
pub mod layer;
pub mod target;

pub use clock::{ClockEvent, ManualClock, MockTimeSource};
pub use formatter::StubFormatter;
pub use layer::{CapturedEvent, MockCaptureLayer};
pub use target::RecordingTarget;

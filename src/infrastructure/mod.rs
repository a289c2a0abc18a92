//! Infrastructure layer - external adapters.
//!
//! This layer provides adapters for:
//! - Time sources and the tokio-driven adaptive clock
//! - Formatters (plain English and locale-table driven)
//! - The shared locale store
//! - Text node render targets

pub mod clock;
pub mod formatter;
pub mod locale;
pub mod target;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// live-timeago = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
